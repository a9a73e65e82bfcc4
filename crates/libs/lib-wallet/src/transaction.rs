//! # Move Call Payloads
//!
//! Builds the transaction payloads the wallet signs and executes. The wallet
//! core only assembles arguments; signing, gas selection and submission happen
//! inside the provider.
//!
//! ```rust
//! use lib_wallet::transaction::{GasBudget, MedichainModule, MoveCall};
//! use serde_json::json;
//!
//! let package = format!("0x{}", "1".repeat(64));
//! let call = MoveCall::new(&package, MedichainModule::Patient, "create_patient")
//!     .argument(json!("Nguyen Van A"))
//!     .gas_budget(GasBudget::CreatePatient);
//! assert_eq!(call.target(), format!("{package}::patient::create_patient"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lib_utils::is_sui_address;

use crate::error::{Result, WalletError};

/// Move modules published by the MediChain package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedichainModule {
    AccessControl,
    Patient,
    Doctor,
    MedicalRecord,
    Prescription,
    Appointment,
}

impl MedichainModule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedichainModule::AccessControl => "access_control",
            MedichainModule::Patient => "patient",
            MedichainModule::Doctor => "doctor",
            MedichainModule::MedicalRecord => "medical_record",
            MedichainModule::Prescription => "prescription",
            MedichainModule::Appointment => "appointment",
        }
    }
}

/// Gas budget per operation, in MIST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasBudget {
    CreatePatient,
    CreateDoctor,
    CreateRecord,
    CreatePrescription,
    Default,
    Custom(u64),
}

impl GasBudget {
    pub fn mist(&self) -> u64 {
        match self {
            GasBudget::CreatePatient | GasBudget::CreateDoctor | GasBudget::Default => 100_000_000,
            GasBudget::CreateRecord => 150_000_000,
            GasBudget::CreatePrescription => 120_000_000,
            GasBudget::Custom(mist) => *mist,
        }
    }
}

/// A single Move function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveCall {
    pub package_object_id: String,
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Value>,
    pub gas_budget: u64,
}

impl MoveCall {
    pub fn new(package_object_id: &str, module: MedichainModule, function: &str) -> Self {
        Self {
            package_object_id: package_object_id.to_string(),
            module: module.as_str().to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            gas_budget: GasBudget::Default.mist(),
        }
    }

    pub fn type_argument(mut self, type_tag: impl Into<String>) -> Self {
        self.type_arguments.push(type_tag.into());
        self
    }

    pub fn argument(mut self, value: Value) -> Self {
        self.arguments.push(value);
        self
    }

    pub fn gas_budget(mut self, budget: GasBudget) -> Self {
        self.gas_budget = budget.mist();
        self
    }

    /// Fully-qualified call target, `package::module::function`.
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package_object_id, self.module, self.function)
    }

    /// Check the payload before handing it to a wallet.
    pub fn validate(&self) -> Result<()> {
        if !is_sui_address(&self.package_object_id) {
            return Err(WalletError::Validation(format!(
                "Package id is not a Sui object id: {}",
                self.package_object_id
            )));
        }
        if self.function.trim().is_empty() {
            return Err(WalletError::Validation("Move function name is empty".to_string()));
        }
        if self.gas_budget == 0 {
            return Err(WalletError::Validation("Gas budget must be positive".to_string()));
        }
        Ok(())
    }
}

/// What the wallet reports back after executing a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn package() -> String {
        format!("0x{}", "ab".repeat(32))
    }

    #[test]
    fn test_gas_budget_table() {
        assert_eq!(GasBudget::CreatePatient.mist(), 100_000_000);
        assert_eq!(GasBudget::CreateRecord.mist(), 150_000_000);
        assert_eq!(GasBudget::CreatePrescription.mist(), 120_000_000);
        assert_eq!(GasBudget::Custom(7).mist(), 7);
    }

    #[test]
    fn test_move_call_builder() {
        let call = MoveCall::new(&package(), MedichainModule::MedicalRecord, "create_record")
            .type_argument("0x2::sui::SUI")
            .argument(json!("diagnosis"))
            .argument(json!(42))
            .gas_budget(GasBudget::CreateRecord);

        assert_eq!(call.module, "medical_record");
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(call.gas_budget, 150_000_000);
        assert!(call.validate().is_ok());

        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["type_arguments"][0], "0x2::sui::SUI");
    }

    #[test]
    fn test_validate_rejects_placeholder_package() {
        let call = MoveCall::new("0xYOUR_PACKAGE_ID_HERE", MedichainModule::Doctor, "register");
        assert!(matches!(call.validate(), Err(WalletError::Validation(_))));

        let call = MoveCall::new(&package(), MedichainModule::Doctor, " ");
        assert!(call.validate().is_err());
    }
}
