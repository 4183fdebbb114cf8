use crc32fast::Hasher;

/// Generate a session seed from a namespace and the current time using CRC32.
///
/// Two editor sessions opened on the same document get different seeds, so
/// ids minted in one session never collide with ids minted in another.
pub fn session_seed(namespace: &str) -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();

    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks and groups within a session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: session_seed(namespace),
            count: 0,
        }
    }

    /// Deterministic generator, mostly useful in tests
    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID, e.g. `hero-3f2a91c0-4`
    pub fn new_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("abc");

        assert_eq!(gen.new_id("hero"), "hero-abc-1");
        assert_eq!(gen.new_id("hero"), "hero-abc-2");
        assert_eq!(gen.new_id("group"), "group-abc-3");
    }

    #[test]
    fn test_generated_ids_share_seed() {
        let mut gen = IdGenerator::new("/storefront/home");
        let seed = gen.seed().to_string();

        let id = gen.new_id("footer");
        assert!(id.starts_with(&format!("footer-{}", seed)));
    }
}
