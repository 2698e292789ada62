use super::fields::{FieldMap, keyed_fields};
use super::MonetaryInput;

keyed_fields! {
    /// Expense lines captured by the expense form.
    pub enum ExpenseField {
        MortgagePayment => "housing_mortgage_payment",
        RentPayment => "housing_rent_payment",
        PropertyTax => "housing_property_tax",
        CondoFee => "housing_condo_fee",
        Hydro => "housing_hydro",
        Water => "housing_water",
        Gas => "housing_gas",
        HousingInsurance => "housing_insurance",
        Repairs => "housing_repairs",
        Internet => "housing_internet",
        CarLoanPayment => "transportation_car_loan_payment",
        VehicleInsurance => "transportation_insurance",
        Fuel => "transportation_fuel",
        Maintenance => "transportation_maintenance",
        PublicTransit => "transportation_public_transit",
        RideHailing => "transportation_ride_hailing",
        DayCare => "dependant_day_care",
        DependantMedicalDental => "dependant_medical_dental",
        DependantClothing => "dependant_clothing",
        SportsRecreation => "dependant_sports_recreation",
        DependantTransportation => "dependant_transportation",
        Tuition => "dependant_tuition",
        DependantHousing => "dependant_housing",
        DependantCellularService => "dependant_cellular_service",
        LineOfCreditPayment => "expenses_line_of_credit_payment",
        StudentLoanPayment => "expenses_student_loan_payment",
        CreditCardPayment => "expenses_credit_card_payment",
        TaxArrearsPayment => "expenses_tax_arrears_payment",
        SmallBusinessLoanPayment => "expenses_small_business_loan_payment",
        Grocery => "expenses_grocery",
        Hygiene => "expenses_hygiene",
        MedicalDental => "expenses_medical_dental",
        Prescription => "expenses_perscription",
        Clothing => "expenses_clothing",
        CellphoneService => "expenses_cellphone_service",
        TravelLifeInsurance => "expenses_travel_life_insurance",
        Fitness => "expenses_fitness",
        Dining => "expenses_dining",
        Entertainment => "expenses_entertainment",
        Vacation => "expenses_vacation",
        Subscriptions => "expenses_subscriptions",
        Beauty => "expenses_beauty",
    }
}

keyed_fields! {
    /// Expense categories reported in the summary.
    pub enum ExpenseCategory {
        Housing => "HOUSING",
        Transportation => "TRANSPORTATION",
        Dependant => "DEPENDANT",
        Debt => "DEBT",
        Essential => "ESSENTIAL",
        Discretionary => "DISCRETIONARY",
    }
}

impl ExpenseField {
    pub fn category(&self) -> ExpenseCategory {
        use ExpenseCategory::*;

        match self {
            Self::MortgagePayment
            | Self::RentPayment
            | Self::PropertyTax
            | Self::CondoFee
            | Self::Hydro
            | Self::Water
            | Self::Gas
            | Self::HousingInsurance
            | Self::Repairs
            | Self::Internet => Housing,
            Self::CarLoanPayment
            | Self::VehicleInsurance
            | Self::Fuel
            | Self::Maintenance
            | Self::PublicTransit
            | Self::RideHailing => Transportation,
            Self::DayCare
            | Self::DependantMedicalDental
            | Self::DependantClothing
            | Self::SportsRecreation
            | Self::DependantTransportation
            | Self::Tuition
            | Self::DependantHousing
            | Self::DependantCellularService => Dependant,
            Self::LineOfCreditPayment
            | Self::StudentLoanPayment
            | Self::CreditCardPayment
            | Self::TaxArrearsPayment
            | Self::SmallBusinessLoanPayment => Debt,
            Self::Grocery
            | Self::Hygiene
            | Self::MedicalDental
            | Self::Prescription
            | Self::Clothing
            | Self::CellphoneService
            | Self::TravelLifeInsurance => Essential,
            Self::Fitness
            | Self::Dining
            | Self::Entertainment
            | Self::Vacation
            | Self::Subscriptions
            | Self::Beauty => Discretionary,
        }
    }

    pub fn frequency_key(&self) -> String {
        format!("frequency_{}_frequency", self.key())
    }
}

impl ExpenseCategory {
    /// Fields belonging to this category, in form order.
    pub fn fields(&self) -> impl Iterator<Item = ExpenseField> + '_ {
        ExpenseField::ALL
            .iter()
            .copied()
            .filter(move |field| field.category() == *self)
    }
}

/// Expense inputs keyed by field.
pub type ExpenseProfile = FieldMap<ExpenseField, MonetaryInput>;
