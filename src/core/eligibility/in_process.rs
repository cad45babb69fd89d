use super::{user_eligible, EligibilityRule};
use crate::domain::model::{Patron, Requestable, ServiceTag};

/// Item has arrived but is still being catalogued.
#[derive(Debug, Clone, Copy)]
pub struct InProcess<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
}

impl<'a> InProcess<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron) -> Self {
        Self { requestable, patron }
    }

    fn requestable_eligible(&self) -> bool {
        !self.requestable.aeon && !self.requestable.charged && self.requestable.in_process
    }
}

impl EligibilityRule for InProcess<'_> {
    fn service_tag(&self) -> ServiceTag {
        ServiceTag::InProcess
    }

    fn eligible(&self) -> bool {
        self.requestable_eligible() && user_eligible(self.patron)
    }
}
