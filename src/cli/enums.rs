//! CLI enum types for character set and sampling options.

use clap::ValueEnum;

use crate::ascii;

/// ASCII character set for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
    Dense,
}

impl From<CharacterSet> for ascii::CharSet {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::Standard => ascii::CharSet::Standard,
            CharacterSet::Blocks => ascii::CharSet::Blocks,
            CharacterSet::Minimal => ascii::CharSet::Minimal,
            CharacterSet::Dense => ascii::CharSet::Dense,
        }
    }
}

/// Downsampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Sampling {
    #[default]
    Box,
    Nearest,
    Bilinear,
}

impl From<Sampling> for ascii::SampleFilter {
    fn from(s: Sampling) -> Self {
        match s {
            Sampling::Box => ascii::SampleFilter::Box,
            Sampling::Nearest => ascii::SampleFilter::Nearest,
            Sampling::Bilinear => ascii::SampleFilter::Bilinear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_to_ascii_charset() {
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Standard),
            ascii::CharSet::Standard
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Blocks),
            ascii::CharSet::Blocks
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Minimal),
            ascii::CharSet::Minimal
        );
        assert_eq!(
            ascii::CharSet::from(CharacterSet::Dense),
            ascii::CharSet::Dense
        );
    }

    #[test]
    fn test_sampling_to_filter() {
        assert_eq!(ascii::SampleFilter::from(Sampling::Box), ascii::SampleFilter::Box);
        assert_eq!(
            ascii::SampleFilter::from(Sampling::Nearest),
            ascii::SampleFilter::Nearest
        );
        assert_eq!(
            ascii::SampleFilter::from(Sampling::Bilinear),
            ascii::SampleFilter::Bilinear
        );
    }

    #[test]
    fn test_names_match_config_values() {
        // `config.ascii.charset` and `config.ascii.sampling` take the same spellings
        for set in CharacterSet::value_variants() {
            let name = set.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(ascii::CharSet::from(*set).name(), name);
        }
        for filter in Sampling::value_variants() {
            let name = filter.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(ascii::SampleFilter::from(*filter).name(), name);
        }
    }
}
