//! Character ramps for luminance mapping.

/// Standard density ramp (10 levels).
/// Characters ordered from darkest (@) to lightest (space).
pub const STANDARD_RAMP: &str = "@%#*+=-:. ";

/// Block character ramp (5 levels).
pub const BLOCKS_RAMP: &str = "█▓▒░ ";

/// Minimal ramp (4 levels).
/// Clean, less noisy look.
pub const MINIMAL_RAMP: &str = "#:. ";

/// Two-level ramp used when a supplied one has fewer than two distinct
/// characters.
pub const FALLBACK_RAMP: &str = "# ";

/// Named ramp presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Standard density ramp (10 levels)
    #[default]
    Standard,
    /// Unicode block ramp (5 levels)
    Blocks,
    /// Minimal ramp (4 levels)
    Minimal,
}

impl CharSet {
    /// Ramp characters for this preset, darkest first.
    pub fn ramp(&self) -> Ramp {
        Ramp::new(self.chars())
    }

    /// The preset as a string of characters.
    pub fn chars(&self) -> &'static str {
        match self {
            CharSet::Standard => STANDARD_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
            CharSet::Minimal => MINIMAL_RAMP,
        }
    }

    /// Get a human-readable name for the charset.
    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }
}

/// An ordered sequence of characters from darkest to lightest.
///
/// Always holds at least two characters: anything with fewer than two
/// distinct characters is replaced by [`FALLBACK_RAMP`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from `chars`, darkest first.
    pub fn new(chars: &str) -> Self {
        let mut collected: Vec<char> = chars.chars().collect();
        let distinct = {
            let mut seen = collected.clone();
            seen.sort_unstable();
            seen.dedup();
            seen.len()
        };
        if distinct < 2 {
            collected = FALLBACK_RAMP.chars().collect();
        }
        Self { chars: collected }
    }

    /// The user's ramp if given, otherwise `default`.
    pub fn from_option(chars: Option<&str>, default: &Ramp) -> Self {
        match chars {
            Some(chars) => Self::new(chars),
            None => default.clone(),
        }
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; a ramp has at least two levels.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The characters, darkest first.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Darkest character.
    pub fn darkest(&self) -> char {
        self.chars[0]
    }

    /// Lightest character.
    pub fn lightest(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    /// Character at `index`, clamped into range.
    pub fn get(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        CharSet::Standard.ramp()
    }
}
