/// Predicate evaluated against the input text.
pub type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

struct Rule<T> {
    predicate: Predicate,
    result: T,
}

/// Ordered list of `{predicate, result}` pairs.
///
/// Rules are evaluated in insertion order and the first predicate that holds
/// decides the result. There is no scoring: insertion order is the only
/// tie-break.
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push<F>(&mut self, predicate: F, result: T)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            predicate: Box::new(predicate),
            result,
        });
    }

    pub fn evaluate(&self, input: &str) -> Option<&T> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(input))
            .map(|rule| &rule.result)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| &rule.result))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let mut rules = RuleSet::new();
        rules.push(|s| s.contains("a"), 1);
        rules.push(|s| s.contains("b"), 2);
        assert_eq!(rules.evaluate("ab"), Some(&1));
        assert_eq!(rules.evaluate("b"), Some(&2));
        assert_eq!(rules.evaluate("c"), None);
    }

    #[test]
    fn empty_set_matches_nothing() {
        let rules: RuleSet<u8> = RuleSet::default();
        assert!(rules.is_empty());
        assert_eq!(rules.len(), 0);
        assert_eq!(rules.evaluate("anything"), None);
    }
}
