//! Business worksheet: annual revenue, costs and net income of a side
//! business.
//!
//! Cost of goods sold lines are per-unit costs; their annualized sum is
//! multiplied by annualized sales volume. All other cost lines are
//! annualized and summed by group.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::aggregators::aggregate;
use crate::calculations::common::{checked_product, checked_sum, round_half_up};
use crate::models::{BusinessCostGroup, BusinessField, BusinessInput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessResult {
    /// Annualized units, hours or rentals.
    pub annual_sales: Decimal,
    /// `totalRevenue`.
    pub revenue: Decimal,
    /// `totalCOGS`.
    pub cogs: Decimal,
    /// `totalOperationalCosts`.
    pub operational: Decimal,
    /// `totalBuildingCosts`.
    pub building: Decimal,
    /// `totalVehicleCosts`.
    pub vehicle: Decimal,
    pub total_costs: Decimal,
    /// `netIncome`. May be negative.
    pub net_income: Decimal,
}

fn group_fields(group: BusinessCostGroup) -> impl Iterator<Item = BusinessField> {
    BusinessField::ALL
        .iter()
        .copied()
        .filter(move |field| field.cost_group() == Some(group))
}

/// Computes the worksheet.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::{BusinessField, BusinessInput, Frequency, MonetaryInput};
/// use budget_core::calculations::business::calculate;
///
/// let mut input = BusinessInput {
///     price: dec!(80),
///     ..BusinessInput::default()
/// };
/// input.lines.set(BusinessField::Sales, MonetaryInput::new(dec!(10), Frequency::Weekly));
/// input.lines.set(BusinessField::Marketing, MonetaryInput::new(dec!(100), Frequency::Monthly));
///
/// let result = calculate(&input);
///
/// assert_eq!(result.revenue, dec!(41600));
/// assert_eq!(result.net_income, dec!(40400));
/// ```
pub fn calculate(input: &BusinessInput) -> BusinessResult {
    let annual_sales = input.lines.get(BusinessField::Sales).annualized();
    let price = if input.price < Decimal::ZERO {
        warn!(price = %input.price, "negative price treated as zero");
        Decimal::ZERO
    } else {
        input.price
    };

    let revenue = round_half_up(checked_product(annual_sales, price));
    let cogs = if input.include_cogs {
        let per_unit = aggregate(&input.lines, group_fields(BusinessCostGroup::Cogs));
        round_half_up(checked_product(per_unit, annual_sales))
    } else {
        Decimal::ZERO
    };
    let operational = aggregate(&input.lines, group_fields(BusinessCostGroup::Operational));
    let building = aggregate(&input.lines, group_fields(BusinessCostGroup::Building));
    let vehicle = aggregate(&input.lines, group_fields(BusinessCostGroup::Vehicle));

    let total_costs = checked_sum([cogs, operational, building, vehicle]);
    let net_income = revenue - total_costs;

    debug!(revenue = %revenue, total_costs = %total_costs, net_income = %net_income, "business worksheet");

    BusinessResult {
        annual_sales,
        revenue,
        cogs,
        operational,
        building,
        vehicle,
        total_costs,
        net_income,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Frequency, MAX_AMOUNT, MonetaryInput};

    fn product_business(include_cogs: bool) -> BusinessInput {
        let mut input = BusinessInput {
            price: dec!(25),
            include_cogs,
            ..BusinessInput::default()
        };
        input
            .lines
            .set(BusinessField::Sales, MonetaryInput::new(dec!(100), Frequency::Monthly));
        input.lines.set(BusinessField::CogsMaterials, MonetaryInput::annual(dec!(4)));
        input.lines.set(BusinessField::CogsShipping, MonetaryInput::annual(dec!(1)));
        input
            .lines
            .set(BusinessField::Rent, MonetaryInput::new(dec!(500), Frequency::Monthly));
        input
            .lines
            .set(BusinessField::BuildingUtilities, MonetaryInput::new(dec!(300), Frequency::Quarterly));
        input
            .lines
            .set(BusinessField::VehicleGas, MonetaryInput::new(dec!(50), Frequency::Weekly));
        input
    }

    #[test]
    fn calculate_sums_each_cost_group() {
        let result = calculate(&product_business(true));

        assert_eq!(result.annual_sales, dec!(1200));
        assert_eq!(result.revenue, dec!(30000));
        assert_eq!(result.cogs, dec!(6000));
        assert_eq!(result.operational, dec!(6000));
        assert_eq!(result.building, dec!(1200));
        assert_eq!(result.vehicle, dec!(2600));
        assert_eq!(result.total_costs, dec!(15800));
        assert_eq!(result.net_income, dec!(14200));
    }

    #[test]
    fn calculate_skips_cogs_when_disabled() {
        let result = calculate(&product_business(false));

        assert_eq!(result.cogs, dec!(0));
        assert_eq!(result.net_income, dec!(20200));
    }

    #[test]
    fn calculate_reports_losses() {
        let mut input = product_business(true);
        input.price = dec!(5);

        assert_eq!(calculate(&input).net_income, dec!(-9800));
    }

    #[test]
    fn calculate_empty_worksheet_is_zero() {
        assert_eq!(calculate(&BusinessInput::default()).net_income, dec!(0));
    }

    #[test]
    fn calculate_overflowing_revenue_is_zero() {
        let mut input = BusinessInput {
            price: MAX_AMOUNT,
            ..BusinessInput::default()
        };
        input
            .lines
            .set(BusinessField::Sales, MonetaryInput::new(MAX_AMOUNT, Frequency::Weekly));

        let result = calculate(&input);

        assert_eq!(result.revenue, dec!(0));
        assert_eq!(result.net_income, dec!(0));
    }
}
