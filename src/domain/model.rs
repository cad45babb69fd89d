use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A fulfillment path the requester may invoke. Serialised as the canonical
/// lowercase tag that downstream handlers dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTag {
    Online,
    Aeon,
    InProcess,
    OnOrder,
    Annex,
    OnShelfEdd,
    OnShelf,
    Recap,
    RecapEdd,
    RecapInLibrary,
    RecapNoItems,
    AskMe,
    ClancyUnavailable,
    ClancyInLibrary,
    ClancyEdd,
    MarquandInLibrary,
    MarquandEdd,
    Ill,
}

impl ServiceTag {
    pub const ALL: [ServiceTag; 18] = [
        ServiceTag::Online,
        ServiceTag::Aeon,
        ServiceTag::InProcess,
        ServiceTag::OnOrder,
        ServiceTag::Annex,
        ServiceTag::OnShelfEdd,
        ServiceTag::OnShelf,
        ServiceTag::Recap,
        ServiceTag::RecapEdd,
        ServiceTag::RecapInLibrary,
        ServiceTag::RecapNoItems,
        ServiceTag::AskMe,
        ServiceTag::ClancyUnavailable,
        ServiceTag::ClancyInLibrary,
        ServiceTag::ClancyEdd,
        ServiceTag::MarquandInLibrary,
        ServiceTag::MarquandEdd,
        ServiceTag::Ill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTag::Online => "online",
            ServiceTag::Aeon => "aeon",
            ServiceTag::InProcess => "in_process",
            ServiceTag::OnOrder => "on_order",
            ServiceTag::Annex => "annex",
            ServiceTag::OnShelfEdd => "on_shelf_edd",
            ServiceTag::OnShelf => "on_shelf",
            ServiceTag::Recap => "recap",
            ServiceTag::RecapEdd => "recap_edd",
            ServiceTag::RecapInLibrary => "recap_in_library",
            ServiceTag::RecapNoItems => "recap_no_items",
            ServiceTag::AskMe => "ask_me",
            ServiceTag::ClancyUnavailable => "clancy_unavailable",
            ServiceTag::ClancyInLibrary => "clancy_in_library",
            ServiceTag::ClancyEdd => "clancy_edd",
            ServiceTag::MarquandInLibrary => "marquand_in_library",
            ServiceTag::MarquandEdd => "marquand_edd",
            ServiceTag::Ill => "ill",
        }
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw item-level attributes carried alongside a holding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(default)]
    pub collection_code: Option<String>,
}

/// One holding of one bibliographic record, as seen by the router.
///
/// Every flag is populated by the catalog before routing; the router does not
/// re-validate them. `services` stays empty until [`crate::core::router::Router::route`]
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requestable {
    pub alma_managed: bool,
    pub partner_holding: bool,
    pub online: bool,
    pub aeon: bool,
    pub charged: bool,
    pub in_process: bool,
    pub on_order: bool,
    pub annex: bool,
    pub recap: bool,
    pub recap_pf: bool,
    pub held_at_marquand_library: bool,
    pub scsb_in_library_use: bool,
    pub circulates: bool,
    pub recap_edd: bool,
    pub eligible_for_library_services: bool,
    pub holding_library_in_library_only: bool,
    pub item_at_clancy: bool,
    pub clancy: bool,
    pub item_data_present: bool,
    pub item: ItemAttributes,
    pub services: Vec<ServiceTag>,
}

impl Requestable {
    pub fn collection_code(&self) -> Option<&str> {
        self.item.collection_code.as_deref()
    }

    /// Managed in the primary catalog or held by a shared-network partner.
    pub fn alma_or_partner(&self) -> bool {
        self.alma_managed || self.partner_holding
    }

    /// Replaces (never appends to) any previously computed services.
    pub fn with_services(mut self, services: Vec<ServiceTag>) -> Self {
        self.services = services;
        self
    }
}

/// Requester trust tier. Exactly one is active per identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatronTier {
    #[default]
    Guest,
    Barcode,
    Cas,
    Alma,
}

impl PatronTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatronTier::Guest => "guest",
            PatronTier::Barcode => "barcode",
            PatronTier::Cas => "cas",
            PatronTier::Alma => "alma",
        }
    }
}

impl fmt::Display for PatronTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated requester. Capability predicates are derived from the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Patron {
    tier: PatronTier,
}

impl Patron {
    pub fn new(tier: PatronTier) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> PatronTier {
        self.tier
    }

    pub fn cas_provider(&self) -> bool {
        self.tier == PatronTier::Cas
    }

    pub fn alma_provider(&self) -> bool {
        self.tier == PatronTier::Alma
    }

    pub fn guest(&self) -> bool {
        self.tier == PatronTier::Guest
    }

    /// Full institutional credential or staff provider.
    pub fn auth_user(&self) -> bool {
        self.cas_provider() || self.alma_provider()
    }
}

impl From<PatronTier> for Patron {
    fn from(tier: PatronTier) -> Self {
        Self::new(tier)
    }
}

/// Display-side holding: a holding id keyed to its raw attribute bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    mfhd_id: String,
    #[serde(default, deserialize_with = "null_as_empty_map")]
    holding_data: serde_json::Map<String, serde_json::Value>,
}

// 缺少或為 null 的 holding_data 都視為空集合
fn null_as_empty_map<'de, D>(
    deserializer: D,
) -> std::result::Result<serde_json::Map<String, serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let data: Option<serde_json::Map<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(data.unwrap_or_default())
}

impl Holding {
    pub fn new(
        mfhd_id: impl Into<String>,
        holding_data: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        Self {
            mfhd_id: mfhd_id.into(),
            holding_data: holding_data.unwrap_or_default(),
        }
    }

    pub fn mfhd_id(&self) -> &str {
        &self.mfhd_id
    }

    pub fn holding_data(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.holding_data
    }

    pub fn to_map(&self) -> HashMap<String, serde_json::Value> {
        HashMap::from([(
            self.mfhd_id.clone(),
            serde_json::Value::Object(self.holding_data.clone()),
        )])
    }
}

/// Result of routing one request in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedRecord {
    pub id: String,
    pub patron_tier: PatronTier,
    pub any_loanable: bool,
    pub services: Vec<ServiceTag>,
}

/// A request left out of the batch because its attributes failed the
/// missing-attribute policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRequest {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub routed_records: Vec<RoutedRecord>,
    pub rejected: Vec<RejectedRequest>,
    pub tag_counts: HashMap<ServiceTag, usize>,
}
