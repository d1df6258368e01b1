#[cfg(test)]
mod test_burglary {
    use bayesnet::scenarios::burglary::BurglaryAlarm;
    use bayesnet::scenarios::ScenarioMaker;
    use bayesnet::{CertifiedNetwork, Evidence, NetworkError, ProbKey, Value};

    fn certified() -> CertifiedNetwork {
        BurglaryAlarm {}.build().unwrap().certify().unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_burglary_given_both_calls() {
        let network = certified();
        let evidence = Evidence::new().with("J", true).with("M", true);
        let p = network.reference_probability("B", &evidence).unwrap();
        assert_close(p, 0.28417, 1e-5);
        assert_close(
            network.probabilistic_inference("B", true, &evidence).unwrap(),
            0.2841718353643929,
            1e-12,
        );
    }

    #[test]
    fn test_earthquake_given_both_calls() {
        let network = certified();
        let evidence = Evidence::new().with("J", true).with("M", true);
        let distribution = network.pre_enum("E", &evidence).unwrap();
        assert_close(
            distribution.get(&Value::Boolean(true)).unwrap(),
            0.17606683840507925,
            1e-12,
        );
    }

    #[test]
    fn test_alarm_with_parents_fixed() {
        let network = certified();
        let evidence = Evidence::new().with("B", true).with("E", false);
        let distribution = network.pre_enum("A", &evidence).unwrap();
        assert_eq!(distribution.len(), 2);
        assert_close(distribution.get(&Value::Boolean(true)).unwrap(), 0.94, 1e-12);
        assert_close(distribution.get(&Value::Boolean(false)).unwrap(), 0.06, 1e-12);
    }

    #[test]
    fn test_root_marginals_equal_cpt_rows() {
        let network = certified();
        let b = network.pre_enum("B", &Evidence::new()).unwrap();
        assert_eq!(b.get(&Value::Boolean(true)), Some(0.001));
        assert_eq!(b.get(&Value::Boolean(false)), Some(1.0 - 0.001));
        let e = network.pre_enum("E", &Evidence::new()).unwrap();
        assert_eq!(e.get(&Value::Boolean(true)), Some(0.002));
    }

    #[test]
    fn test_evidence_probability() {
        let network = certified();
        let evidence = Evidence::new().with("J", true).with("M", true);
        assert_close(
            network.evidence_probability(&evidence).unwrap(),
            0.002084100239,
            1e-12,
        );
        assert_eq!(network.evidence_probability(&Evidence::new()).unwrap(), 1.0);
    }

    #[test]
    fn test_missing_entry_fails_validation() {
        let scenario = BurglaryAlarm {};
        assert!(scenario.build().unwrap().defined_check());

        // Rebuild without P(M=false | A=false).
        let full = scenario.build().unwrap();
        let mut partial = bayesnet::Network::new();
        for variable in full.variables() {
            partial.add_node(variable.clone()).unwrap();
        }
        for variable in full.variables() {
            let parents = variable.parents();
            let entries = full.entries(variable.name()).unwrap();
            for configuration in entries.configurations() {
                for value in variable.domain() {
                    let is_dropped = variable.name() == "M"
                        && configuration == &vec![Value::Boolean(false)]
                        && value == &Value::Boolean(false);
                    if is_dropped {
                        continue;
                    }
                    let key = parents.iter().zip(configuration).fold(
                        ProbKey::new(variable.name(), value.clone()),
                        |key, (parent, parent_value)| key.given(parent, parent_value.clone()),
                    );
                    let p = entries.get(configuration, value).unwrap();
                    partial.add_prob([(key, p)]).unwrap();
                }
            }
        }
        assert!(!partial.defined_check());
        assert_eq!(
            partial.certify().unwrap_err(),
            NetworkError::IncompleteTable {
                variable: "M".to_string(),
                configuration: vec![Value::Boolean(false)],
                value: Value::Boolean(false),
            }
        );
    }
}
