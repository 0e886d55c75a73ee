use crate::types::{HashMap, HashMapExt};
use anyhow::{Result, anyhow, bail};
use needletail::parse_fastx_file;
use std::path::Path;

/// Read lengths keyed by read ID, loaded from a FASTA or FASTQ file.
#[derive(Debug, Default)]
pub struct ReadLengths {
    lengths: HashMap<String, u32>,
}

impl ReadLengths {
    /// Load every record of `path`; a read ID seen twice aborts the load.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = parse_fastx_file(path)
            .map_err(|e| anyhow!("failed to open reads {}: {}", path.display(), e))?;
        let mut lengths: HashMap<String, u32> = HashMap::new();

        while let Some(result) = reader.next() {
            let record =
                result.map_err(|e| anyhow!("failed to parse read record: {}", e))?;
            let header = std::str::from_utf8(record.id()).unwrap_or("");
            let name = header.split_whitespace().next().unwrap_or("").to_string();
            let len = record.num_bases() as u32;
            if lengths.insert(name.clone(), len).is_some() {
                bail!("duplicate read ID '{}' in {}", name, path.display());
            }
        }

        Ok(Self { lengths })
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut lengths: HashMap<String, u32> = HashMap::new();
        for (name, len) in pairs {
            let name = name.into();
            if lengths.insert(name.clone(), len).is_some() {
                bail!("duplicate read ID '{}'", name);
            }
        }
        Ok(Self { lengths })
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.lengths.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }
}
