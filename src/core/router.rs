//! Decision tree that turns a holding and a requester into an ordered list of
//! fulfillment services.
//!
//! Branches are mutually exclusive guards evaluated top to bottom. Their order
//! encodes a priority among availability concerns (unavailable, in process,
//! on order, then location category) and must not be rearranged.

use crate::core::eligibility::{select_eligible, EligibilityRule, Ill, OnShelf, OnShelfEdd};
use crate::domain::model::{Patron, Requestable, ServiceTag};

/// Collection code of partner material that may still leave the building when
/// flagged in-library-use.
const CIRCULATING_PARTNER_COLLECTION: &str = "MR";

#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
    any_loanable: bool,
}

impl<'a> Router<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron, any_loanable: bool) -> Self {
        Self {
            requestable,
            patron,
            any_loanable,
        }
    }

    /// Routes `requestable` and returns it with `services` replaced.
    pub fn route(requestable: Requestable, patron: &Patron, any_loanable: bool) -> Requestable {
        let services = Router::new(&requestable, patron, any_loanable).calculate_services();
        requestable.with_services(services)
    }

    pub fn calculate_services(&self) -> Vec<ServiceTag> {
        let requestable = self.requestable;
        let services = if requestable.alma_or_partner() && requestable.online {
            vec![ServiceTag::Online]
        } else if requestable.alma_or_partner() && !requestable.aeon {
            self.calculate_alma_or_scsb_services()
        } else {
            vec![ServiceTag::Aeon]
        };

        tracing::trace!(
            patron = %self.patron.tier(),
            any_loanable = self.any_loanable,
            ?services,
            "routed requestable"
        );
        services
    }

    fn calculate_alma_or_scsb_services(&self) -> Vec<ServiceTag> {
        if !self.patron.auth_user() {
            return Vec::new();
        }

        let requestable = self.requestable;
        if requestable.charged {
            self.calculate_unavailable_services()
        } else if requestable.in_process {
            vec![ServiceTag::InProcess]
        } else if requestable.on_order {
            vec![ServiceTag::OnOrder]
        } else if requestable.annex {
            vec![ServiceTag::Annex, ServiceTag::OnShelfEdd]
        } else if requestable.recap || requestable.recap_pf {
            self.calculate_recap_services()
        } else if requestable.held_at_marquand_library {
            self.calculate_marquand_services()
        } else {
            self.calculate_on_shelf_services()
        }
    }

    fn calculate_on_shelf_services(&self) -> Vec<ServiceTag> {
        let edd = OnShelfEdd::new(self.requestable, self.patron);
        let on_shelf = OnShelf::new(self.requestable, self.patron);
        let rules: [&dyn EligibilityRule; 2] = [&edd, &on_shelf];
        select_eligible(&rules)
    }

    fn calculate_recap_services(&self) -> Vec<ServiceTag> {
        let requestable = self.requestable;
        let in_library_use_only = requestable.scsb_in_library_use
            && requestable.collection_code() != Some(CIRCULATING_PARTNER_COLLECTION);

        if !requestable.item_data_present {
            vec![ServiceTag::RecapNoItems]
        } else if in_library_use_only
            || (!requestable.circulates && !requestable.recap_edd)
            || requestable.recap_pf
        {
            vec![ServiceTag::RecapInLibrary]
        } else if requestable.scsb_in_library_use && !requestable.eligible_for_library_services {
            vec![ServiceTag::AskMe]
        } else {
            // auth_user is already guaranteed by the caller
            let mut services = Vec::with_capacity(2);
            if !requestable.holding_library_in_library_only
                && requestable.circulates
                && requestable.eligible_for_library_services
            {
                services.push(ServiceTag::Recap);
            }
            if requestable.recap_edd {
                services.push(ServiceTag::RecapEdd);
            }
            services
        }
    }

    fn calculate_unavailable_services(&self) -> Vec<ServiceTag> {
        let ill = Ill::new(self.requestable, self.patron, self.any_loanable);
        if ill.eligible() {
            vec![ill.service_tag()]
        } else {
            Vec::new()
        }
    }

    fn calculate_marquand_services(&self) -> Vec<ServiceTag> {
        let requestable = self.requestable;
        if requestable.item_at_clancy && !requestable.clancy {
            vec![ServiceTag::ClancyUnavailable]
        } else if requestable.clancy {
            vec![ServiceTag::ClancyInLibrary, ServiceTag::ClancyEdd]
        } else {
            vec![ServiceTag::MarquandInLibrary, ServiceTag::MarquandEdd]
        }
    }
}
