//! Eligibility rules: one stateless policy per fulfillment service.
//!
//! A rule is bound to a single requestable/patron pair for the length of one
//! evaluation. `eligible()` never fails and has no side effects; an ineligible
//! rule is simply dropped by the caller.

pub mod ill;
pub mod in_process;
pub mod on_shelf;

use crate::domain::model::{Patron, Requestable, ServiceTag};
use serde::Serialize;
use std::fmt;

pub use ill::Ill;
pub use in_process::InProcess;
pub use on_shelf::{Annex, OnShelf, OnShelfEdd};

pub trait EligibilityRule {
    fn service_tag(&self) -> ServiceTag;
    fn eligible(&self) -> bool;
}

impl fmt::Display for dyn EligibilityRule + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_tag().as_str())
    }
}

/// Tags of the rules in `rules` that answer true, in the order given.
pub fn select_eligible(rules: &[&dyn EligibilityRule]) -> Vec<ServiceTag> {
    rules
        .iter()
        .filter(|rule| rule.eligible())
        .map(|rule| rule.service_tag())
        .collect()
}

/// Holding category qualifies for direct pickup from an open shelf.
pub(crate) fn on_shelf_eligible(requestable: &Requestable) -> bool {
    !requestable.aeon
        && !requestable.charged
        && !requestable.in_process
        && !requestable.on_order
        && !requestable.recap
        && !requestable.recap_pf
        && !requestable.held_at_marquand_library
}

pub(crate) fn user_eligible(patron: &Patron) -> bool {
    patron.auth_user()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleVerdict {
    pub service: ServiceTag,
    pub eligible: bool,
}

/// Every rule's answer for one requestable, independent of router branch order.
/// Used to explain why a tag was or was not offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityReport {
    pub verdicts: Vec<RuleVerdict>,
}

impl EligibilityReport {
    pub fn evaluate(requestable: &Requestable, patron: &Patron, any_loanable: bool) -> Self {
        let on_shelf_edd = OnShelfEdd::new(requestable, patron);
        let on_shelf = OnShelf::new(requestable, patron);
        let annex = Annex::new(requestable, patron);
        let in_process = InProcess::new(requestable, patron);
        let ill = Ill::new(requestable, patron, any_loanable);
        let rules: [&dyn EligibilityRule; 5] = [&on_shelf_edd, &on_shelf, &annex, &in_process, &ill];

        let verdicts = rules
            .iter()
            .map(|rule| RuleVerdict {
                service: rule.service_tag(),
                eligible: rule.eligible(),
            })
            .collect();

        Self { verdicts }
    }

    pub fn eligible_services(&self) -> Vec<ServiceTag> {
        self.verdicts
            .iter()
            .filter(|v| v.eligible)
            .map(|v| v.service)
            .collect()
    }
}
