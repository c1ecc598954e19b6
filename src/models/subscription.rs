use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::dates;

/// A subscription contract as delivered by the CRM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionRecord {
    #[serde(default)]
    pub subscription_name: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(with = "dates")]
    pub subscription_start_date: NaiveDateTime,
    #[serde(with = "dates")]
    pub subscription_end_date: NaiveDateTime,
    #[serde(default, with = "dates::option")]
    pub next_due_date: Option<NaiveDateTime>,
    #[serde(default, with = "dates::option")]
    pub last_due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub subscription_frequency: String,
    #[serde(default, deserialize_with = "nullable")]
    pub subscription_contract_amount: ContractAmount,
    #[serde(default)]
    pub department_names: Option<Department>,
    #[serde(default)]
    pub subscription_category: Option<Category>,
    #[serde(default, with = "vendor_profile")]
    pub vendor_profile: Option<VendorProfile>,
    #[serde(default, rename = "status")]
    pub status: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractAmount {
    #[serde(rename = "Value", default)]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Department {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Category {
    #[serde(default)]
    pub name: Option<String>,
}

/// Classification of a vendor relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorProfile {
    Strategic,
    Tactical,
    Operational,
}

impl VendorProfile {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Strategic),
            1 => Some(Self::Tactical),
            2 => Some(Self::Operational),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Strategic => 0,
            Self::Tactical => 1,
            Self::Operational => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Strategic => "Strategic",
            Self::Tactical => "Tactical",
            Self::Operational => "Operational",
        }
    }
}

impl SubscriptionRecord {
    pub fn amount(&self) -> f64 {
        self.subscription_contract_amount.value
    }

    /// Year 1 is the CRM's placeholder for an unset date.
    pub fn has_real_start(&self) -> bool {
        self.subscription_start_date.year() != 1
    }

    pub fn is_zero_span(&self) -> bool {
        self.subscription_start_date == self.subscription_end_date
    }

    pub fn is_active(&self) -> bool {
        self.status == 0
    }

    pub fn department_name(&self) -> Option<&str> {
        self.department_names.as_ref().map(|d| d.name.as_str())
    }

    pub fn department_budget(&self) -> f64 {
        self.department_names
            .as_ref()
            .and_then(|d| d.budget)
            .unwrap_or(0.0)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.subscription_category
            .as_ref()
            .and_then(|c| c.name.as_deref())
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

mod vendor_profile {
    use super::*;

    pub fn serialize<S: Serializer>(
        profile: &Option<VendorProfile>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match profile {
            Some(p) => serializer.serialize_i64(p.code()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<VendorProfile>, D::Error> {
        let code: Option<i64> = Option::deserialize(deserializer)?;
        Ok(code.and_then(VendorProfile::from_code))
    }
}
