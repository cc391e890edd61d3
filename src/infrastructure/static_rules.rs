use crate::domain::ports::RuleResolver;
use crate::domain::rule::{Rule, RuleKey};
use crate::error::{Result, VoucherError};
use std::collections::HashMap;

/// A rule catalogue fixed at construction time.
///
/// Built either from the demo defaults or from any iterator of rules, e.g. the
/// rows of a CSV catalogue. When two rules share a key the later one wins.
#[derive(Debug, Default, Clone)]
pub struct StaticRuleCatalogue {
    rules: HashMap<RuleKey, Rule>,
}

impl StaticRuleCatalogue {
    /// Creates an empty catalogue. Every lookup fails until rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the catalogue seeded with the default loan rules.
    pub fn with_defaults() -> Self {
        Self::from_rules(default_rules())
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut catalogue = Self::new();
        for rule in rules {
            catalogue.insert(rule);
        }
        catalogue
    }

    pub fn insert(&mut self, rule: Rule) {
        self.rules.insert(rule.key.clone(), rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleResolver for StaticRuleCatalogue {
    fn resolve(&self, key: &RuleKey) -> Result<Rule> {
        self.rules
            .get(key)
            .cloned()
            .ok_or_else(|| VoucherError::RuleNotFound(key.clone()))
    }
}

fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            RuleKey::new("loan_repayplan", "principal"),
            "1221.01.01",
            "1012.X.02",
        ),
        Rule::new(
            RuleKey::new("loan_repayplan", "interest"),
            "1221.01.02",
            "6001.03.01",
        ),
        Rule::new(
            RuleKey::new("loan_repayplan", "fin_service"),
            "1221.01.03",
            "6001.03.02",
        ),
        Rule::new(
            RuleKey::new("repay_before_compensate", "principal"),
            "1221.03",
            "1221.02.01",
        ),
        Rule::new(
            RuleKey::new("repay_before_compensate", "interest"),
            "1221.03",
            "1221.02.02",
        ),
    ]
}
