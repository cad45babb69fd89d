use crate::domain::model::{ItemAttributes, Patron, Requestable};
use crate::utils::error::{Result, RouterError};
use serde::{Deserialize, Serialize};

/// How absent requestable attributes are treated when a batch is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAttributePolicy {
    /// Absent means false.
    #[default]
    FalsyDefault,
    /// Absent routing-critical attribute rejects the request.
    FailFast,
}

impl std::str::FromStr for MissingAttributePolicy {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "falsy_default" => Ok(MissingAttributePolicy::FalsyDefault),
            "fail_fast" => Ok(MissingAttributePolicy::FailFast),
            other => Err(RouterError::InvalidConfigValueError {
                field: "missing_attributes".to_string(),
                value: other.to_string(),
                reason: "Valid values: falsy_default, fail_fast".to_string(),
            }),
        }
    }
}

/// Requestable attributes as they arrive from the catalog export. Every flag is
/// optional so the loader can tell "false" from "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestableInput {
    pub alma_managed: Option<bool>,
    pub partner_holding: Option<bool>,
    pub online: Option<bool>,
    pub aeon: Option<bool>,
    pub charged: Option<bool>,
    pub in_process: Option<bool>,
    pub on_order: Option<bool>,
    pub annex: Option<bool>,
    pub recap: Option<bool>,
    pub recap_pf: Option<bool>,
    pub held_at_marquand_library: Option<bool>,
    pub scsb_in_library_use: Option<bool>,
    pub circulates: Option<bool>,
    pub recap_edd: Option<bool>,
    pub eligible_for_library_services: Option<bool>,
    pub holding_library_in_library_only: Option<bool>,
    pub item_at_clancy: Option<bool>,
    pub clancy: Option<bool>,
    pub item_data_present: Option<bool>,
    pub item: ItemAttributes,
}

impl RequestableInput {
    /// Attributes the top-level decision reads before anything else.
    pub const REQUIRED: [&'static str; 4] = ["alma_managed", "partner_holding", "online", "aeon"];

    fn required_values(&self) -> [Option<bool>; 4] {
        [self.alma_managed, self.partner_holding, self.online, self.aeon]
    }

    pub fn into_requestable(self, request_id: &str, policy: MissingAttributePolicy) -> Result<Requestable> {
        if policy == MissingAttributePolicy::FailFast {
            if let Some((attribute, _)) = Self::REQUIRED
                .iter()
                .zip(self.required_values())
                .find(|(_, value)| value.is_none())
            {
                return Err(RouterError::MissingAttributeError {
                    request_id: request_id.to_string(),
                    attribute: attribute.to_string(),
                });
            }
        }

        Ok(Requestable {
            alma_managed: self.alma_managed.unwrap_or(false),
            partner_holding: self.partner_holding.unwrap_or(false),
            online: self.online.unwrap_or(false),
            aeon: self.aeon.unwrap_or(false),
            charged: self.charged.unwrap_or(false),
            in_process: self.in_process.unwrap_or(false),
            on_order: self.on_order.unwrap_or(false),
            annex: self.annex.unwrap_or(false),
            recap: self.recap.unwrap_or(false),
            recap_pf: self.recap_pf.unwrap_or(false),
            held_at_marquand_library: self.held_at_marquand_library.unwrap_or(false),
            scsb_in_library_use: self.scsb_in_library_use.unwrap_or(false),
            circulates: self.circulates.unwrap_or(false),
            recap_edd: self.recap_edd.unwrap_or(false),
            eligible_for_library_services: self.eligible_for_library_services.unwrap_or(false),
            holding_library_in_library_only: self.holding_library_in_library_only.unwrap_or(false),
            item_at_clancy: self.item_at_clancy.unwrap_or(false),
            clancy: self.clancy.unwrap_or(false),
            item_data_present: self.item_data_present.unwrap_or(false),
            item: self.item,
            services: Vec::new(),
        })
    }
}

/// One line of a batch: which holding, who is asking, and the record-level
/// `any_loanable` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub id: String,
    pub requestable: RequestableInput,
    #[serde(default)]
    pub patron: Patron,
    #[serde(default)]
    pub any_loanable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBatch {
    pub requests: Vec<RouteRequest>,
}
