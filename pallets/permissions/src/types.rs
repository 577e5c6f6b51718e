use codec::{Decode, Encode};
use permissioning_primitives::OrgId;
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

/// Network-wide settings owned by an implementation and carried over on
/// upgrade.
#[derive(Encode, Decode, Clone, Default, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct Policy {
	pub alliance_admin_org: Option<OrgId>,
	/// Once set, bootstrap calls are closed for good.
	pub network_boot: bool,
}

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct ImplementationState<AccountId> {
	/// The upgradable proxy allowed to migrate this implementation.
	pub upgradable: AccountId,
	pub policy: Policy,
}

/// Raw genesis description of an alliance node:
/// `(node_id, miner_role, vrf_pk, bls_pk, weight)`.
pub type GenesisNode = (sp_std::vec::Vec<u8>, u8, sp_std::vec::Vec<u8>, sp_std::vec::Vec<u8>, u64);
