/// Read identifier as it appears in the alignment file.
pub type ReadName = String;
/// Index into the run-wide list of fusion groups.
pub type GroupId = usize;

// AHash-backed maps; bring in `HashMapExt` / `HashSetExt` for `new()`.
pub type HashMap<K, V> = ahash::HashMap<K, V>;
pub type HashSet<K> = ahash::HashSet<K>;
pub use ahash::HashMapExt;
pub use ahash::HashSetExt;
