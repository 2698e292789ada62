use serde::{Deserialize, Serialize};

use super::fields::{FieldMap, keyed_fields};
use super::MonetaryInput;

keyed_fields! {
    /// Recurring lines of the business worksheet.
    pub enum BusinessField {
        Sales => "sales",
        CogsMaterials => "cogsMaterials",
        CogsLabor => "cogsLabor",
        CogsOverhead => "cogsOverhead",
        CogsShipping => "cogsShipping",
        Rent => "rent",
        Utilities => "utilities",
        Salaries => "salaries",
        Marketing => "marketing",
        Insurance => "insurance",
        Travel => "travel",
        Hotel => "hotel",
        BuildingRent => "buildingRent",
        BuildingMaintenance => "buildingMaintenance",
        BuildingUtilities => "buildingUtilities",
        VehicleGas => "vehicleGas",
        VehicleMaintenance => "vehicleMaintenance",
        VehicleInsurance => "vehicleInsurance",
        VehicleRental => "vehicleRental",
        VehicleLease => "vehicleLease",
    }
}

/// Cost groups of the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessCostGroup {
    /// Per-unit cost of goods sold.
    Cogs,
    Operational,
    Building,
    Vehicle,
}

impl BusinessField {
    /// Cost group of the line; `None` for the sales volume.
    pub fn cost_group(&self) -> Option<BusinessCostGroup> {
        use BusinessCostGroup::*;

        match self {
            Self::Sales => None,
            Self::CogsMaterials | Self::CogsLabor | Self::CogsOverhead | Self::CogsShipping => {
                Some(Cogs)
            }
            Self::Rent
            | Self::Utilities
            | Self::Salaries
            | Self::Marketing
            | Self::Insurance
            | Self::Travel
            | Self::Hotel => Some(Operational),
            Self::BuildingRent | Self::BuildingMaintenance | Self::BuildingUtilities => {
                Some(Building)
            }
            Self::VehicleGas
            | Self::VehicleMaintenance
            | Self::VehicleInsurance
            | Self::VehicleRental
            | Self::VehicleLease => Some(Vehicle),
        }
    }

    pub fn frequency_key(&self) -> String {
        format!("{}Frequency", self.key())
    }
}

/// What the sales volume counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueType {
    #[default]
    Rental,
    Service,
    Product,
}

impl RevenueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rental => "rental",
            Self::Service => "service",
            Self::Product => "product",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "service" => Self::Service,
            "product" => Self::Product,
            _ => Self::Rental,
        }
    }

    /// Labels for the volume and price inputs.
    pub fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::Rental => ("Rentals Contracted", "Price Per Rental"),
            Self::Service => ("Hours Billed", "Price Per Hour"),
            Self::Product => ("Units Sold", "Price Per Unit"),
        }
    }
}

/// Inputs of the business worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInput {
    pub revenue_type: RevenueType,
    /// Price per unit, hour or rental. Not annualized.
    pub price: rust_decimal::Decimal,
    /// Whether cost of goods sold lines are counted.
    pub include_cogs: bool,
    pub lines: FieldMap<BusinessField, MonetaryInput>,
}
