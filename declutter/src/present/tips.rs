//! Maintenance tips for the Tips view

/// One static tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    /// Short tag shown above the title
    pub tag: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

pub const MAINTENANCE_TIPS: [Tip; 3] = [
    Tip {
        tag: "TIME",
        title: "The 2-Minute Rule",
        body: "If a mess takes less than 2 minutes to fix, do it immediately.",
    },
    Tip {
        tag: "LOOP",
        title: "One In, One Out",
        body: "For every new item you buy, donate or discard an old one.",
    },
    Tip {
        tag: "TAG",
        title: "Label Everything",
        body: "Visual markers prevent items from drifting.",
    },
];
