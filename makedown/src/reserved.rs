/// Headings whose code blocks are copied into the Makefile as-is instead of
/// declaring a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedSection {
    /// `variables:` holds variable assignments.
    Variables,
    /// `makedown:` holds raw Makefile text.
    Makedown,
}

impl ReservedSection {
    pub const ALL: [ReservedSection; 2] = [ReservedSection::Variables, ReservedSection::Makedown];

    /// The heading text, colon included.
    pub fn heading(self) -> &'static str {
        match self {
            ReservedSection::Variables => "variables:",
            ReservedSection::Makedown => "makedown:",
        }
    }

    pub fn from_target(target: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.heading() == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names_only() {
        assert_eq!(ReservedSection::from_target("variables:"), Some(ReservedSection::Variables));
        assert_eq!(ReservedSection::from_target("makedown:"), Some(ReservedSection::Makedown));
        assert_eq!(ReservedSection::from_target("Variables:"), None);
        assert_eq!(ReservedSection::from_target("variables"), None);
        assert_eq!(ReservedSection::from_target("build:"), None);
    }
}
