use super::{user_eligible, EligibilityRule};
use crate::domain::model::{Patron, Requestable, ServiceTag};

/// Interlibrary loan in place of a copy that is checked out.
///
/// `any_loanable` is true when some other holding of the same record can be
/// borrowed right now; the patron should request that copy instead.
#[derive(Debug, Clone, Copy)]
pub struct Ill<'a> {
    requestable: &'a Requestable,
    patron: &'a Patron,
    any_loanable: bool,
}

impl<'a> Ill<'a> {
    pub fn new(requestable: &'a Requestable, patron: &'a Patron, any_loanable: bool) -> Self {
        Self {
            requestable,
            patron,
            any_loanable,
        }
    }

    fn requestable_eligible(&self) -> bool {
        !self.requestable.aeon && self.requestable.charged && !self.any_loanable
    }
}

impl EligibilityRule for Ill<'_> {
    fn service_tag(&self) -> ServiceTag {
        ServiceTag::Ill
    }

    fn eligible(&self) -> bool {
        self.requestable_eligible() && user_eligible(self.patron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PatronTier;

    fn charged_item() -> Requestable {
        Requestable {
            alma_managed: true,
            charged: true,
            circulates: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ill_eligible_when_no_copy_loanable() {
        let requestable = charged_item();
        let patron = Patron::new(PatronTier::Cas);
        assert!(Ill::new(&requestable, &patron, false).eligible());
    }

    #[test]
    fn test_ill_not_eligible_when_another_copy_loanable() {
        let requestable = charged_item();
        let patron = Patron::new(PatronTier::Cas);
        assert!(!Ill::new(&requestable, &patron, true).eligible());
    }

    #[test]
    fn test_ill_requires_auth_user() {
        let requestable = charged_item();
        assert!(Ill::new(&requestable, &Patron::new(PatronTier::Alma), false).eligible());
        assert!(!Ill::new(&requestable, &Patron::new(PatronTier::Barcode), false).eligible());
        assert!(!Ill::new(&requestable, &Patron::new(PatronTier::Guest), false).eligible());
    }

    #[test]
    fn test_ill_not_eligible_for_available_item() {
        let requestable = Requestable {
            charged: false,
            ..charged_item()
        };
        let patron = Patron::new(PatronTier::Cas);
        assert!(!Ill::new(&requestable, &patron, false).eligible());
    }
}
