use std::collections::BTreeMap;

use proptest::prelude::*;
use toolbelt_config::{expand_list, expand_string};

fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_default_clause_and_override() {
    assert_eq!(expand_string("foo ${BAR:default}", &BTreeMap::new()), "foo default");
    assert_eq!(expand_string("foo ${BAR:default}", &vars(&[("BAR", "baz")])), "foo baz");
    assert_eq!(expand_string("foo ${BAR:de:fault}", &BTreeMap::new()), "foo de:fault");
}

#[test]
fn test_list_splitting_and_dropping() {
    let list = vec!["${X}".to_string()];
    assert_eq!(
        expand_list(&list, &vars(&[("X", "--cov=a --cov=b")])),
        vec!["--cov=a", "--cov=b"]
    );
    assert!(expand_list(&["${EMPTY:}".to_string()], &BTreeMap::new()).is_empty());
}

proptest! {
    #[test]
    fn test_literal_strings_are_fixed_points(s in "[^$]*") {
        prop_assert_eq!(expand_string(&s, &BTreeMap::new()), s);
    }

    #[test]
    fn test_expansion_is_idempotent(
        prefix in "[a-z /.-]{0,12}",
        name in "[A-Z][A-Z0-9_]{0,8}",
        value in "[a-zA-Z0-9 ./=-]{0,16}",
        suffix in "[a-z /.-]{0,12}",
    ) {
        let variables = vars(&[(name.as_str(), value.as_str())]);
        let template = format!("{prefix}${{{name}}}{suffix}");

        let once = expand_string(&template, &variables);
        prop_assert_eq!(&once, &format!("{prefix}{value}{suffix}"));
        prop_assert_eq!(expand_string(&once, &variables), once);
    }

    #[test]
    fn test_substituted_values_are_not_rescanned(name in "[A-Z]{1,6}", inner in "[A-Z]{1,6}") {
        prop_assume!(name != inner);
        let literal = format!("${{{inner}}}");
        let variables = vars(&[(name.as_str(), literal.as_str()), (inner.as_str(), "nested")]);
        prop_assert_eq!(expand_string(&format!("${{{name}}}"), &variables), literal);
    }
}
