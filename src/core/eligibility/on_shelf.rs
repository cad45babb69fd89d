use super::{on_shelf_eligible, user_eligible, EligibilityRule};
use crate::domain::model::{Patron, Requestable, ServiceTag};

/// In-person pickup from open stacks.
#[derive(Debug, Clone, Copy)]
pub struct OnShelf<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
}

impl<'a> OnShelf<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron) -> Self {
        Self { requestable, patron }
    }

    fn requestable_eligible(&self) -> bool {
        on_shelf_eligible(self.requestable) && !self.requestable.annex
    }
}

impl EligibilityRule for OnShelf<'_> {
    fn service_tag(&self) -> ServiceTag {
        ServiceTag::OnShelf
    }

    fn eligible(&self) -> bool {
        self.requestable_eligible() && user_eligible(self.patron)
    }
}

/// Scan-on-demand of an open-stacks item.
#[derive(Debug, Clone, Copy)]
pub struct OnShelfEdd<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
}

impl<'a> OnShelfEdd<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron) -> Self {
        Self { requestable, patron }
    }

    fn requestable_eligible(&self) -> bool {
        on_shelf_eligible(self.requestable) && !self.requestable.annex
    }
}

impl EligibilityRule for OnShelfEdd<'_> {
    fn service_tag(&self) -> ServiceTag {
        ServiceTag::OnShelfEdd
    }

    fn eligible(&self) -> bool {
        self.requestable_eligible() && user_eligible(self.patron)
    }
}

/// Self-service pickup from the offsite annex.
#[derive(Debug, Clone, Copy)]
pub struct Annex<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
}

impl<'a> Annex<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron) -> Self {
        Self { requestable, patron }
    }

    fn requestable_eligible(&self) -> bool {
        on_shelf_eligible(self.requestable) && self.requestable.annex
    }
}

impl EligibilityRule for Annex<'_> {
    fn service_tag(&self) -> ServiceTag {
        ServiceTag::Annex
    }

    fn eligible(&self) -> bool {
        self.requestable_eligible() && user_eligible(self.patron)
    }
}
