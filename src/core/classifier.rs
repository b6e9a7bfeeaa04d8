/// A target needs the scanner's IPv6 mode when it has more than this many `:` separators.
///
/// This is a textual heuristic, not address parsing: short forms such as `::1`
/// land in the other group.
pub const IPV6_SEPARATOR_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTargets {
    pub ipv6: Vec<String>,
    pub others: Vec<String>,
}

impl ClassifiedTargets {
    pub fn len(&self) -> usize {
        self.ipv6.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn is_ipv6(target: &str) -> bool {
    target.matches(':').count() > IPV6_SEPARATOR_THRESHOLD
}

/// Stable partition of `targets` into IPv6 literals and everything else.
pub fn classify<I, T>(targets: I) -> ClassifiedTargets
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut classified = ClassifiedTargets::default();
    for target in targets {
        let target = target.into();
        if is_ipv6(&target) {
            classified.ipv6.push(target);
        } else {
            classified.others.push(target);
        }
    }
    classified
}
