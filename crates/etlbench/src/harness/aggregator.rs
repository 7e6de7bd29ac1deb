// Dweve ETLBench - Tabular Engine Benchmark Harness
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Summary statistics over measurement samples.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with Bessel's correction.
///
/// Undefined, and therefore `None`, below two samples.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_std_dev() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&values), Some(2.5));
        let std = sample_std_dev(&values).unwrap();
        assert!((std - 1.290_994_448_735_805_6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_has_no_data() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std_dev(&[]), None);
    }

    #[test]
    fn test_single_sample_has_no_std_dev() {
        assert_eq!(mean(&[0.25]), Some(0.25));
        assert_eq!(sample_std_dev(&[0.25]), None);
    }

    proptest! {
        #[test]
        fn prop_mean_within_range(values in prop::collection::vec(0.0f64..1.0e6, 1..50)) {
            let avg = mean(&values).unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(avg >= min - 1e-6);
            prop_assert!(avg <= max + 1e-6);
        }

        #[test]
        fn prop_std_dev_non_negative(values in prop::collection::vec(0.0f64..1.0e6, 2..50)) {
            let std = sample_std_dev(&values).unwrap();
            prop_assert!(std >= 0.0);
            prop_assert!(std.is_finite());
        }

        #[test]
        fn prop_constant_samples_have_zero_spread(value in 0.0f64..1.0e3, n in 2usize..20) {
            let values = vec![value; n];
            prop_assert!(sample_std_dev(&values).unwrap() < 1e-9);
        }
    }
}
