//! Ordered classification rules
//!
//! A [`RuleChain`] is a list of predicate/label pairs evaluated top to bottom.
//! The first predicate that holds wins; if none does, the chain's fallback
//! label applies. Budget health and savings goal status are both expressed
//! this way so the tier order lives in one table instead of nested branches.

/// A single predicate and the label it assigns
pub struct Rule<C, L> {
    pub label: L,
    pub when: fn(&C) -> bool,
}

/// Rules evaluated in order, with a label for when none match
pub struct RuleChain<C: 'static, L: 'static> {
    pub rules: &'static [Rule<C, L>],
    pub fallback: L,
}

impl<C: 'static, L: Copy + 'static> RuleChain<C, L> {
    /// Label of the first matching rule, or the fallback
    pub fn classify(&self, ctx: &C) -> L {
        self.rules
            .iter()
            .find(|rule| (rule.when)(ctx))
            .map(|rule| rule.label)
            .unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negative(n: &i32) -> bool {
        *n < 0
    }

    fn small(n: &i32) -> bool {
        *n < 10
    }

    const SIZES: RuleChain<i32, &str> = RuleChain {
        rules: &[
            Rule {
                label: "negative",
                when: negative,
            },
            Rule {
                label: "small",
                when: small,
            },
        ],
        fallback: "large",
    };

    #[test]
    fn test_first_match_wins() {
        // -5 satisfies both predicates; the earlier rule takes it
        assert_eq!(SIZES.classify(&-5), "negative");
        assert_eq!(SIZES.classify(&3), "small");
        assert_eq!(SIZES.classify(&42), "large");
    }
}
