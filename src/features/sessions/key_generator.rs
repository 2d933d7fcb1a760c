use rand::Rng;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyGeneratorError {
    #[error("Code alphabet must not be empty")]
    EmptyAlphabet,

    #[error("Code alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),

    #[error("Code length must be at least 1")]
    ZeroLength,
}

/// Draws random codes from a fixed alphabet and length.
///
/// Generation never consults the registry; collision handling is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl KeyGenerator {
    pub fn new(alphabet: &str, length: usize) -> Result<Self, KeyGeneratorError> {
        let symbols: Vec<char> = alphabet.chars().collect();
        if symbols.is_empty() {
            return Err(KeyGeneratorError::EmptyAlphabet);
        }
        if length == 0 {
            return Err(KeyGeneratorError::ZeroLength);
        }
        for (i, c) in symbols.iter().enumerate() {
            if symbols[..i].contains(c) {
                return Err(KeyGeneratorError::DuplicateSymbol(*c));
            }
        }

        Ok(Self {
            alphabet: symbols,
            length,
        })
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
            .collect()
    }

    /// Number of distinct codes, saturating at `usize::MAX`
    pub fn capacity(&self) -> usize {
        u32::try_from(self.length)
            .ok()
            .and_then(|exp| self.alphabet.len().checked_pow(exp))
            .unwrap_or(usize::MAX)
    }

    /// Canonical form of user input.
    ///
    /// Folds case when every letter of the alphabet has the same case, so
    /// "ab3d" finds "AB3D" on an upper-case alphabet.
    pub fn normalize(&self, input: &str) -> String {
        let input = input.trim();
        let has_upper = self.alphabet.iter().any(|c| c.is_uppercase());
        let has_lower = self.alphabet.iter().any(|c| c.is_lowercase());

        match (has_upper, has_lower) {
            (true, false) => input.to_uppercase(),
            (false, true) => input.to_lowercase(),
            _ => input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "23456789ACDEFGHJKLMNPRSTUVWXYZ";

    #[test]
    fn test_generate_has_configured_length_and_alphabet() {
        for length in 1..=8 {
            let generator = KeyGenerator::new(ALPHABET, length).unwrap();
            for _ in 0..200 {
                let code = generator.generate();
                assert_eq!(code.chars().count(), length);
                assert!(code.chars().all(|c| ALPHABET.contains(c)), "{code}");
            }
        }
    }

    #[test]
    fn test_generate_single_symbol_alphabet() {
        let generator = KeyGenerator::new("Q", 3).unwrap();
        assert_eq!(generator.generate(), "QQQ");
    }

    #[test]
    fn test_generate_eventually_uses_every_symbol() {
        let generator = KeyGenerator::new("AB", 1).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(generator.generate());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert_eq!(
            KeyGenerator::new("", 4).unwrap_err(),
            KeyGeneratorError::EmptyAlphabet
        );
        assert_eq!(
            KeyGenerator::new("ABC", 0).unwrap_err(),
            KeyGeneratorError::ZeroLength
        );
        assert_eq!(
            KeyGenerator::new("ABCA", 2).unwrap_err(),
            KeyGeneratorError::DuplicateSymbol('A')
        );
    }

    #[test]
    fn test_capacity() {
        assert_eq!(KeyGenerator::new("AB", 1).unwrap().capacity(), 2);
        assert_eq!(KeyGenerator::new("0123456789", 3).unwrap().capacity(), 1000);
        assert_eq!(KeyGenerator::new(ALPHABET, 4).unwrap().capacity(), 30usize.pow(4));
        assert_eq!(
            KeyGenerator::new("0123456789", 64).unwrap().capacity(),
            usize::MAX
        );
    }

    #[test]
    fn test_normalize_folds_case_for_single_case_alphabet() {
        let upper = KeyGenerator::new(ALPHABET, 4).unwrap();
        assert_eq!(upper.normalize(" ab3d \n"), "AB3D");

        let lower = KeyGenerator::new("abc123", 4).unwrap();
        assert_eq!(lower.normalize("AB12"), "ab12");

        let mixed = KeyGenerator::new("aB", 2).unwrap();
        assert_eq!(mixed.normalize("Ab"), "Ab");
    }
}
