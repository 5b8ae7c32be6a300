use approx::assert_relative_eq;
use rstest::rstest;

use crate::substitution_models::{DNASubstModel, FreqVector};

const HKY_PARAMS: [f64; 5] = [0.22, 0.26, 0.33, 0.19, 2.0];
const TN93_PARAMS: [f64; 7] = [0.22, 0.26, 0.33, 0.19, 0.5970915, 0.2940435, 0.00135];
const GTR_PARAMS: [f64; 10] = [0.1, 0.3, 0.4, 0.2, 5.0, 1.0, 1.0, 1.0, 1.0, 5.0];

fn all_models() -> Vec<DNASubstModel> {
    vec![
        DNASubstModel::new("JC69", &[]).unwrap(),
        DNASubstModel::new("K80", &[2.0]).unwrap(),
        DNASubstModel::new("HKY", &HKY_PARAMS).unwrap(),
        DNASubstModel::new("TN93", &TN93_PARAMS).unwrap(),
        DNASubstModel::new("GTR", &GTR_PARAMS).unwrap(),
    ]
}

#[test]
fn q_rows_sum_to_zero() {
    for model in all_models() {
        for i in 0..4 {
            assert_relative_eq!(model.q().row(i).sum(), 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn q_normalised_to_unit_rate() {
    for model in all_models() {
        let rate: f64 = (0..4).map(|i| -model.freqs()[i] * model.q()[(i, i)]).sum();
        assert_relative_eq!(rate, 1.0, epsilon = 1e-12);
    }
}

#[rstest]
#[case(0.0)]
#[case(0.1)]
#[case(0.5)]
#[case(2.5)]
fn p_rows_sum_to_one(#[case] time: f64) {
    for model in all_models() {
        let p = model.p(time);
        for i in 0..4 {
            assert_relative_eq!(p.row(i).sum(), 1.0, epsilon = 1e-10);
        }
    }
}

#[test]
fn p_at_zero_time_is_identity() {
    for model in all_models() {
        let p = model.p(0.0);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(p[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }
}

#[rstest]
#[case(0.05)]
#[case(0.25)]
#[case(1.0)]
fn jc69_p_matches_closed_form(#[case] time: f64) {
    let model = DNASubstModel::new("jc69", &[]).unwrap();
    let p = model.p(time);
    let same = 0.25 + 0.75 * (-4.0 * time / 3.0).exp();
    let diff = 0.25 - 0.25 * (-4.0 * time / 3.0).exp();
    for i in 0..4 {
        for j in 0..4 {
            let expected = if i == j { same } else { diff };
            assert_relative_eq!(p[(i, j)], expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn hky_with_unit_kappa_is_jc69() {
    let hky = DNASubstModel::new("HKY", &[0.25, 0.25, 0.25, 0.25, 1.0]).unwrap();
    let jc69 = DNASubstModel::new("JC69", &[]).unwrap();
    for i in 0..4 {
        for j in 0..4 {
            assert_relative_eq!(hky.q()[(i, j)], jc69.q()[(i, j)], epsilon = 1e-12);
        }
    }
}

#[test]
fn freqs_are_stationary() {
    for model in all_models() {
        let pi = model.freqs().transpose();
        let propagated = &pi * model.p(0.7);
        for i in 0..4 {
            assert_relative_eq!(propagated[i], pi[i], epsilon = 1e-10);
        }
    }
}

#[test]
fn model_names_case_insensitive() {
    assert_eq!(
        DNASubstModel::new("gtr", &GTR_PARAMS).unwrap(),
        DNASubstModel::new("GTR", &GTR_PARAMS).unwrap()
    );
    assert_eq!(
        DNASubstModel::new("hky85", &HKY_PARAMS).unwrap(),
        DNASubstModel::new("HKY", &HKY_PARAMS).unwrap()
    );
}

#[test]
fn unknown_model_rejected() {
    assert!(DNASubstModel::new("WAG", &[]).is_err());
}

#[rstest]
#[case::hky_too_few("HKY", &[0.25, 0.25, 0.25, 0.25])]
#[case::tn93_too_few("TN93", &[0.22, 0.26, 0.33, 0.19, 0.597])]
#[case::gtr_too_many("GTR", &[0.1, 0.3, 0.4, 0.2, 5.0, 1.0, 1.0, 1.0, 1.0, 5.0, 1.0])]
fn wrong_parameter_count_rejected(#[case] name: &str, #[case] params: &[f64]) {
    assert!(DNASubstModel::new(name, params).is_err());
}

#[test]
fn frequencies_must_sum_to_one() {
    assert!(DNASubstModel::new("HKY", &[0.3, 0.3, 0.3, 0.3, 2.0]).is_err());
}

#[test]
fn freqs_match_input() {
    let model = DNASubstModel::new("GTR", &GTR_PARAMS).unwrap();
    assert_eq!(
        model.freqs(),
        &FreqVector::from_column_slice(&[0.1, 0.3, 0.4, 0.2])
    );
}
