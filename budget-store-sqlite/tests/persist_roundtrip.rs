use budget_core::calculations::{BudgetCalculator, CalculatorConfig};
use budget_core::store::persist::{load_input, load_outputs, save_input, save_result};
use budget_core::store::{KeyValueStore, Ttl};
use budget_core::{
    AssetField, BalanceInput, BracketSchedule, BudgetInput, ExpenseField, Frequency, IncomeField,
    JurisdictionProfile, JurisdictionTable, MonetaryInput, Region, TaxBracket,
};
use budget_store_sqlite::SqliteStore;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

async fn store() -> SqliteStore {
    let store = SqliteStore::connect(":memory:").await.expect("connect");
    store.run_migrations().await.expect("migrations");
    store
}

fn calculator() -> BudgetCalculator {
    let table = JurisdictionTable::new([JurisdictionProfile {
        region: Region::Usa,
        subregion: None,
        basic_amount: dec!(14600),
        brackets: BracketSchedule::new(vec![
            TaxBracket::new(dec!(11600), dec!(0.10)),
            TaxBracket::unbounded(dec!(0.12)),
        ])
        .expect("valid brackets"),
    }]);
    BudgetCalculator::new(CalculatorConfig::default(), table)
}

fn input() -> BudgetInput {
    let mut input = BudgetInput::new(Region::Usa);
    input
        .income
        .set(IncomeField::SalaryWages, MonetaryInput::new(dec!(1500), Frequency::Weekly));
    input
        .expenses
        .set(ExpenseField::RentPayment, MonetaryInput::new(dec!(1800), Frequency::Monthly));
    input
        .assets
        .set(AssetField::CheckingAccounts, BalanceInput::new(dec!(4000)));
    input
}

#[tokio::test]
async fn input_survives_sqlite_round_trip() {
    let store = store().await;

    save_input(&store, &input(), Ttl::default()).await.unwrap();
    let loaded = load_input(&store).await.unwrap();

    assert_eq!(loaded, input());
}

#[tokio::test]
async fn results_persist_and_reload() {
    let store = store().await;
    let result = calculator().calculate(&input()).unwrap();

    save_result(&store, &result, Ttl::default()).await.unwrap();
    let outputs = load_outputs(&store).await.unwrap();

    assert_eq!(store.get("ANNUALINCOME").await.unwrap(), Some("78000.00".to_string()));
    assert_eq!(store.get("HOUSING").await.unwrap(), Some("21600.00".to_string()));
    assert!(outputs.contains(&("SD", dec!(14600))));
    assert!(outputs.contains(&("DISPOSABLEINCOME", result.summary.disposable_income)));
}
