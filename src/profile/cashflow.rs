//! Cash-flow profile entity and its amount, quantity and variable-cost series

use serde::{Deserialize, Serialize};

use super::{ProfileFunction, Ramp, DEFAULT_QUANTITY_UNIT_SCALE, DEFAULT_TOTAL_PERIODS, PERIODS_PER_YEAR};
use crate::discount::{discount, discount_series, quarterly_rate};
use crate::error::{FlowError, Result};
use crate::flow::{Flow, FlowId, FlowRecord};

/// Validated, unit-converted inputs for one profile line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowParams {
    pub name: String,
    pub function: ProfileFunction,
    pub is_cost: bool,
    pub delay_periods: u32,
    pub scale_up_periods: u32,
    /// Target currency amount
    pub max_amount: f64,
    /// Currency amount already present at the end of the delay
    pub start_amount: f64,
    /// Throughput reached at full ramp, in `quantity_unit_scale` units
    pub digital_quantity: f64,
    pub variable_cost_per_unit: f64,
    /// Annual rate; stored and reported quarterly (divided by 4)
    pub discount_rate_annual: f64,
    pub total_periods: usize,
    pub quantity_unit_scale: f64,
}

impl Default for CashFlowParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            function: ProfileFunction::Sigmoid,
            is_cost: false,
            delay_periods: 0,
            scale_up_periods: 4,
            max_amount: 0.0,
            start_amount: 0.0,
            digital_quantity: 0.0,
            variable_cost_per_unit: 0.0,
            discount_rate_annual: 0.0,
            total_periods: DEFAULT_TOTAL_PERIODS,
            quantity_unit_scale: DEFAULT_QUANTITY_UNIT_SCALE,
        }
    }
}

/// Serializable description of a profile: exactly its inputs, no series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRecord {
    pub delay_periods: u32,
    pub digital_quantity: f64,
    pub discount_rate_quarterly: f64,
    pub flow_id: FlowId,
    pub function: ProfileFunction,
    pub is_cost: bool,
    pub name: String,
    pub start_amount: f64,
    pub max_amount: f64,
    pub scale_up_periods: u32,
    pub total_periods: usize,
}

/// A single assumption projected into per-quarter series.
///
/// Immutable once built; every series operation takes `discounted`
/// explicitly so a profile can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowProfile {
    id: FlowId,
    name: String,
    function: ProfileFunction,
    ramp: Ramp,
    is_cost: bool,
    max_amount: f64,
    start_amount: f64,
    digital_quantity: f64,
    variable_cost_per_unit: f64,
    discount_rate_quarterly: f64,
    total_periods: usize,
    quantity_unit_scale: f64,
}

fn check_ramp(id: FlowId, name: &str, function: ProfileFunction, scale_up_periods: u32) -> Result<()> {
    if function.requires_ramp() && scale_up_periods < 2 {
        log::warn!("rejecting flow {} ({}): {} with scale-up {}", name, id, function, scale_up_periods);
        return Err(FlowError::InvalidScaleUp {
            flow_id: id,
            name: name.to_string(),
            function: function.to_string(),
            scale_up_periods,
        });
    }
    Ok(())
}

impl CashFlowProfile {
    /// Build a profile with a freshly generated id
    pub fn new(params: CashFlowParams) -> Result<Self> {
        Self::with_id(FlowId::new(), params)
    }

    /// Build a profile under a caller-supplied id
    pub fn with_id(id: FlowId, params: CashFlowParams) -> Result<Self> {
        check_ramp(id, &params.name, params.function, params.scale_up_periods)?;

        log::debug!(
            "built {} profile {} ({}) over {} periods",
            params.function, params.name, id, params.total_periods
        );

        Ok(Self {
            id,
            name: params.name,
            function: params.function,
            ramp: Ramp::new(params.delay_periods, params.scale_up_periods),
            is_cost: params.is_cost,
            max_amount: params.max_amount,
            start_amount: params.start_amount,
            digital_quantity: params.digital_quantity,
            variable_cost_per_unit: params.variable_cost_per_unit,
            discount_rate_quarterly: quarterly_rate(params.discount_rate_annual),
            total_periods: params.total_periods,
            quantity_unit_scale: params.quantity_unit_scale,
        })
    }

    /// Rebuild a profile from its record, keeping the record's id.
    /// The record carries neither the per-unit cost nor the quantity unit
    /// scale, so the caller supplies both.
    pub fn from_record(
        record: &CashFlowRecord,
        variable_cost_per_unit: f64,
        quantity_unit_scale: f64,
    ) -> Result<Self> {
        let params = CashFlowParams {
            name: record.name.clone(),
            function: record.function,
            is_cost: record.is_cost,
            delay_periods: record.delay_periods,
            scale_up_periods: record.scale_up_periods,
            max_amount: record.max_amount,
            start_amount: record.start_amount,
            digital_quantity: record.digital_quantity,
            variable_cost_per_unit,
            discount_rate_annual: record.discount_rate_quarterly * PERIODS_PER_YEAR as f64,
            total_periods: record.total_periods,
            quantity_unit_scale,
        };
        Self::with_id(record.flow_id, params)
    }

    pub fn function(&self) -> ProfileFunction {
        self.function
    }

    pub fn ramp(&self) -> Ramp {
        self.ramp
    }

    pub fn is_cost(&self) -> bool {
        self.is_cost
    }

    pub fn discount_rate_quarterly(&self) -> f64 {
        self.discount_rate_quarterly
    }

    /// Record of the inputs this profile was built from
    pub fn record(&self) -> CashFlowRecord {
        CashFlowRecord {
            delay_periods: self.ramp.delay_periods,
            digital_quantity: self.digital_quantity,
            discount_rate_quarterly: self.discount_rate_quarterly,
            flow_id: self.id,
            function: self.function,
            is_cost: self.is_cost,
            name: self.name.clone(),
            start_amount: self.start_amount,
            max_amount: self.max_amount,
            scale_up_periods: self.ramp.scale_up_periods,
            total_periods: self.total_periods,
        }
    }

    /// Amount series using `function` instead of the configured shape
    pub fn shape_series(&self, function: ProfileFunction, discounted: bool) -> Result<Vec<f64>> {
        check_ramp(self.id, &self.name, function, self.ramp.scale_up_periods)?;
        Ok(self.project(function, self.max_amount, self.start_amount, self.sign(), discounted))
    }

    fn sign(&self) -> f64 {
        if self.is_cost { -1.0 } else { 1.0 }
    }

    /// Shared series generator: zero inside the delay, then start + delta,
    /// signed, optionally discounted at the absolute period index.
    fn project(&self, function: ProfileFunction, target: f64, start: f64, sign: f64, discounted: bool) -> Vec<f64> {
        (0..self.total_periods)
            .map(|period| {
                if self.ramp.is_delayed(period) {
                    return 0.0;
                }
                let value = sign * (function.delta(period, &self.ramp, target, start) + start);
                if discounted {
                    discount(value, self.discount_rate_quarterly, period)
                } else {
                    value
                }
            })
            .collect()
    }
}

impl Flow for CashFlowProfile {
    fn id(&self) -> FlowId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn total_periods(&self) -> usize {
        self.total_periods
    }

    fn amount_series(&self, discounted: bool) -> Vec<f64> {
        self.project(self.function, self.max_amount, self.start_amount, self.sign(), discounted)
    }

    /// Throughput ramps from zero and is never sign-flipped
    fn quantity_series(&self, discounted: bool) -> Vec<f64> {
        self.project(self.function, self.digital_quantity, 0.0, 1.0, discounted)
    }

    fn variable_cost_series(&self, discounted: bool) -> Vec<f64> {
        let quantity = self.quantity_series(false);
        let cost = trapezoidal_variable_cost(&quantity, self.quantity_unit_scale, self.variable_cost_per_unit);
        if discounted {
            discount_series(&cost, self.discount_rate_quarterly)
        } else {
            cost
        }
    }

    fn to_record(&self) -> FlowRecord {
        FlowRecord::CashFlow(self.record())
    }
}

/// Integrate the quantity-driven cost rate over each quarter.
///
/// The per-period cost `-unit_scale * quantity * cost_per_unit` is treated as
/// a sampled rate; period `n + 1` receives the trapezoid between samples `n`
/// and `n + 1`. Period 0 is always 0.
pub fn trapezoidal_variable_cost(quantity: &[f64], unit_scale: f64, cost_per_unit: f64) -> Vec<f64> {
    let rate: Vec<f64> = quantity
        .iter()
        .map(|q| -unit_scale * q * cost_per_unit)
        .collect();

    if rate.is_empty() {
        return Vec::new();
    }

    let mut cost = Vec::with_capacity(rate.len());
    cost.push(0.0);
    cost.extend(rate.windows(2).map(|w| (w[0] + w[1]) / 2.0));
    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn params(function: ProfileFunction) -> CashFlowParams {
        CashFlowParams {
            name: "test".to_string(),
            function,
            delay_periods: 2,
            scale_up_periods: 4,
            start_amount: 1.0,
            max_amount: 5.0,
            digital_quantity: 5.0,
            variable_cost_per_unit: 0.01,
            discount_rate_annual: 0.1,
            total_periods: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_key_points() {
        let cf = CashFlowProfile::new(CashFlowParams {
            start_amount: 0.0,
            max_amount: 10.0,
            ..params(ProfileFunction::Linear)
        })
        .unwrap();
        assert_eq!(cf.amount_series(false), vec![0.0, 0.0, 0.0, 2.5, 5.0, 7.5, 10.0, 10.0]);

        let cf = CashFlowProfile::new(params(ProfileFunction::Linear)).unwrap();
        let qtr = cf.amount_series(false);
        assert_eq!(qtr[2], 1.0);
        assert_eq!(qtr[4], 3.0);
        assert_eq!(qtr[6], 5.0);
    }

    #[test]
    fn test_sigmoid_key_points() {
        for &(start, max) in &[(1.0, 5.0), (0.0, 5.0), (250.0, 1000.0)] {
            let cf = CashFlowProfile::new(CashFlowParams {
                start_amount: start,
                max_amount: max,
                ..params(ProfileFunction::Sigmoid)
            })
            .unwrap();
            let qtr = cf.amount_series(false);
            let correction = 0.05 * (max - start);
            assert_abs_diff_eq!(qtr[2], start + correction, epsilon = 1e-9);
            assert_eq!(qtr[4], start + (max - start) / 2.0);
            assert_abs_diff_eq!(qtr[6], max - correction, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_step_holds_max_after_delay() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Step)).unwrap();
        let qtr = cf.amount_series(false);
        assert_eq!(&qtr[..2], &[0.0, 0.0]);
        assert!(qtr[2..].iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_single_pays_once() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Single)).unwrap();
        assert_eq!(cf.amount_series(false), vec![0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_delay_window_is_zero_for_every_shape() {
        for function in ProfileFunction::ALL {
            let cf = CashFlowProfile::new(CashFlowParams {
                delay_periods: 3,
                is_cost: true,
                ..params(function)
            })
            .unwrap();
            for discounted in [false, true] {
                let amount = cf.amount_series(discounted);
                let quantity = cf.quantity_series(discounted);
                assert_eq!(amount.len(), 8);
                assert_eq!(quantity.len(), 8);
                assert!(amount[..3].iter().all(|&v| v == 0.0), "{} amount", function);
                assert!(quantity[..3].iter().all(|&v| v == 0.0), "{} quantity", function);
            }
        }
    }

    #[test]
    fn test_cost_negates_amount_only() {
        let revenue = CashFlowProfile::new(params(ProfileFunction::Linear)).unwrap();
        let cost = CashFlowProfile::new(CashFlowParams { is_cost: true, ..params(ProfileFunction::Linear) }).unwrap();
        let r = revenue.amount_series(false);
        let c = cost.amount_series(false);
        for p in 2..8 {
            assert_eq!(c[p], -r[p]);
        }
        assert_eq!(cost.quantity_series(false), revenue.quantity_series(false));
    }

    #[test]
    fn test_discounting_uses_absolute_period() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Step)).unwrap();
        let plain = cf.amount_series(false);
        let pv = cf.amount_series(true);
        assert_relative_eq!(cf.discount_rate_quarterly(), 0.025, epsilon = 1e-12);
        for p in 2..8 {
            assert_relative_eq!(pv[p], plain[p] / 1.025_f64.powi(p as i32), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_quantity_ramps_from_zero() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Linear)).unwrap();
        let q = cf.quantity_series(false);
        assert_eq!(q, vec![0.0, 0.0, 0.0, 1.25, 2.5, 3.75, 5.0, 5.0]);
    }

    #[test]
    fn test_variable_cost_is_trapezoidal() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Linear)).unwrap();
        let q = cf.quantity_series(false);
        let vc = cf.variable_cost_series(false);
        assert_eq!(vc.len(), 8);
        assert_eq!(vc[0], 0.0);
        let rate: Vec<f64> = q.iter().map(|v| -1_000_000.0 * v * 0.01).collect();
        for n in 0..7 {
            assert_relative_eq!(vc[n + 1], (rate[n] + rate[n + 1]) / 2.0, epsilon = 1e-9);
        }
        // 1.25 and 2.5 million units at 0.01 per unit
        assert_relative_eq!(vc[4], -18_750.0, epsilon = 1e-9);
    }

    #[test]
    fn test_discounted_variable_cost() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Sigmoid)).unwrap();
        let plain = cf.variable_cost_series(false);
        let pv = cf.variable_cost_series(true);
        assert_eq!(pv[0], 0.0);
        for p in 1..8 {
            assert_relative_eq!(pv[p], plain[p] / 1.025_f64.powi(p as i32), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_trapezoid_edges() {
        assert!(trapezoidal_variable_cost(&[], 1.0, 1.0).is_empty());
        assert_eq!(trapezoidal_variable_cost(&[4.0], 1.0, 1.0), vec![0.0]);
        assert_eq!(trapezoidal_variable_cost(&[2.0, 4.0], 1.0, 1.0), vec![0.0, -3.0]);
    }

    #[test]
    fn test_scale_up_must_be_at_least_two() {
        for function in [ProfileFunction::Sigmoid, ProfileFunction::Linear, ProfileFunction::Single] {
            let err = CashFlowProfile::new(CashFlowParams { scale_up_periods: 1, ..params(function) }).unwrap_err();
            match err {
                FlowError::InvalidScaleUp { name, scale_up_periods, .. } => {
                    assert_eq!(name, "test");
                    assert_eq!(scale_up_periods, 1);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
        assert!(CashFlowProfile::new(CashFlowParams { scale_up_periods: 0, ..params(ProfileFunction::Step) }).is_ok());
    }

    #[test]
    fn test_shape_series_overrides_function() {
        let cf = CashFlowProfile::new(CashFlowParams {
            scale_up_periods: 1,
            ..params(ProfileFunction::Step)
        })
        .unwrap();
        assert!(cf.shape_series(ProfileFunction::Linear, false).is_err());

        let cf = CashFlowProfile::new(params(ProfileFunction::Sigmoid)).unwrap();
        let step = cf.shape_series(ProfileFunction::Step, false).unwrap();
        assert_eq!(step[7], 5.0);
        assert_eq!(cf.shape_series(ProfileFunction::Sigmoid, true).unwrap(), cf.amount_series(true));
    }

    #[test]
    fn test_record_round_trip() {
        let input = CashFlowParams {
            name: "Digital platform".to_string(),
            is_cost: true,
            discount_rate_annual: 0.12,
            ..params(ProfileFunction::Single)
        };
        let cf = CashFlowProfile::new(input.clone()).unwrap();
        let record = cf.record();

        assert_eq!(record.name, input.name);
        assert_eq!(record.function, input.function);
        assert_eq!(record.is_cost, input.is_cost);
        assert_eq!(record.delay_periods, input.delay_periods);
        assert_eq!(record.scale_up_periods, input.scale_up_periods);
        assert_eq!(record.start_amount, input.start_amount);
        assert_eq!(record.max_amount, input.max_amount);
        assert_eq!(record.digital_quantity, input.digital_quantity);
        assert_eq!(record.total_periods, input.total_periods);
        assert_eq!(record.discount_rate_quarterly, 0.03);
        assert_eq!(record.flow_id, cf.id());

        let rebuilt = CashFlowProfile::from_record(
            &record,
            input.variable_cost_per_unit,
            input.quantity_unit_scale,
        )
        .unwrap();
        assert_eq!(rebuilt, cf);
        assert_eq!(rebuilt.record(), record);
    }

    #[test]
    fn test_rebuild_keeps_quantity_scale() {
        let input = CashFlowParams {
            quantity_unit_scale: 1_000.0,
            ..params(ProfileFunction::Linear)
        };
        let cf = CashFlowProfile::new(input.clone()).unwrap();
        let rebuilt = CashFlowProfile::from_record(
            &cf.record(),
            input.variable_cost_per_unit,
            input.quantity_unit_scale,
        )
        .unwrap();
        assert_eq!(rebuilt.variable_cost_series(false), cf.variable_cost_series(false));
        // 1.25 and 2.5 thousand units at 0.01 per unit
        assert_relative_eq!(rebuilt.variable_cost_series(false)[4], -18.75, epsilon = 1e-9);
    }

    #[test]
    fn test_record_json_keys() {
        let cf = CashFlowProfile::new(params(ProfileFunction::Linear)).unwrap();
        let value = serde_json::to_value(cf.record()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "delayPeriods", "digitalQuantity", "discountRateQuarterly", "flowId", "function",
                "isCost", "maxAmount", "name", "scaleUpPeriods", "startAmount", "totalPeriods",
            ]
        );
        assert_eq!(value["function"], "linear");
        assert_eq!(value["flowId"], cf.id().to_string());
    }

    #[test]
    fn test_fresh_ids() {
        let a = CashFlowProfile::new(params(ProfileFunction::Step)).unwrap();
        let b = CashFlowProfile::new(params(ProfileFunction::Step)).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
