//! Exemption lookups against the treasury lists.

use lunc_store::TreasuryKeeper;
use lunc_types::AccAddress;

/// True when any of `addresses` is on the burn-tax exemption list.
///
/// Callers pass both ends of a transfer: a message between an exempt account
/// and anyone else is untaxed.
pub fn has_pair_exemption<T: TreasuryKeeper + ?Sized>(
    treasury: &T,
    addresses: &[&AccAddress],
) -> bool {
    !addresses.is_empty() && treasury.has_burn_tax_exemption_address(addresses)
}

/// True when funds sent to `contract` are exempt from burn tax.
pub fn has_contract_exemption<T: TreasuryKeeper + ?Sized>(
    treasury: &T,
    contract: &AccAddress,
) -> bool {
    treasury.has_burn_tax_exemption_contract(contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunc_nullables::NullChain;

    fn addr(n: u8) -> AccAddress {
        AccAddress::new(vec![n; 20]).unwrap()
    }

    #[test]
    fn any_member_of_a_pair_exempts_the_transfer() {
        let chain = NullChain::new().with_exempt_pair(&addr(1), &addr(2));
        assert!(has_pair_exemption(&chain, &[&addr(1), &addr(9)]));
        assert!(has_pair_exemption(&chain, &[&addr(9), &addr(2)]));
        assert!(!has_pair_exemption(&chain, &[&addr(8), &addr(9)]));
        assert!(!has_pair_exemption(&chain, &[]));
    }

    #[test]
    fn contract_list_is_separate() {
        let contract = AccAddress::new(vec![4u8; 32]).unwrap();
        let chain = NullChain::new().with_exempt_contract(&contract);
        assert!(has_contract_exemption(&chain, &contract));
        assert!(!has_pair_exemption(&chain, &[&contract]));
    }
}
