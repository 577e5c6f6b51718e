use codec::{Decode, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

/// Identifier of an organization.
pub type OrgId = Vec<u8>;

/// Identifier of a node (its enode id).
pub type NodeId = Vec<u8>;

/// Public key material carried by a miner.
pub type PublicKey = Vec<u8>;

/// Weight assigned to a node that is not a miner.
pub const NO_WEIGHT: u64 = 0;

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum OrgStatus {
	NotInList = 0,
	Proposed = 1,
	Approved = 2,
	PendingSuspension = 3,
	Suspended = 4,
	PendingSuspensionRevoke = 5,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum AccountStatus {
	NotInList = 0,
	PendingApproval = 1,
	Active = 2,
	Suspended = 3,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum AccessLevel {
	ReadOnly = 0,
	Transact = 1,
	ContractDeploy = 2,
	/// Reserved for alliance admin accounts.
	FullAccess = 3,
}

impl AccessLevel {
	/// Levels that can be granted through the ordinary account paths.
	pub fn is_assignable(&self) -> bool {
		*self != AccessLevel::FullAccess
	}

	/// Anything above read-only makes the holder a voter candidate.
	pub fn grants_vote(&self) -> bool {
		*self > AccessLevel::ReadOnly
	}
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum NodeStatus {
	NotInList = 0,
	PendingApproval = 1,
	Active = 2,
	PendingSuspended = 3,
	Suspended = 4,
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum MinerRole {
	NotAMiner = 0,
	ProposalMiner = 1,
	VerifyMiner = 2,
	ProposalAndVerifyMiner = 3,
}

impl MinerRole {
	pub fn is_miner(&self) -> bool {
		*self != MinerRole::NotAMiner
	}
}

impl TryFrom<u8> for MinerRole {
	type Error = ();

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(MinerRole::NotAMiner),
			1 => Ok(MinerRole::ProposalMiner),
			2 => Ok(MinerRole::VerifyMiner),
			3 => Ok(MinerRole::ProposalAndVerifyMiner),
			_ => Err(()),
		}
	}
}

#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum MinerStatus {
	NotValidated = 0,
	PendingValidate = 1,
	Validated = 2,
	PendingAbolish = 3,
}

/// Status request applied to organizations and accounts.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum StatusAction {
	Suspend = 1,
	RevokeSuspend = 2,
}

/// Status request applied to nodes. `PendingSuspend` is only reachable
/// through the miner removal cascade.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum NodeStatusAction {
	Suspend = 1,
	RevokeSuspend = 2,
	PendingSuspend = 3,
}

/// Kind of change a pending operation stands for.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum OperationType {
	AddOrg = 1,
	SuspendOrg = 2,
	RevokeSuspendOrg = 3,
	AssignAllianceAdmin = 4,
	RemoveAllianceAdmin = 5,
	AddMinerNode = 6,
	AssignNodeToMiner = 7,
	RemoveMiner = 8,
}

/// Miner attributes of a node.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct MinerProfile {
	pub role: MinerRole,
	pub vrf_pk: PublicKey,
	pub bls_pk: PublicKey,
	pub weight: u64,
}

impl MinerProfile {
	pub fn new(role: MinerRole, vrf_pk: PublicKey, bls_pk: PublicKey, weight: u64) -> Self {
		Self { role, vrf_pk, bls_pk, weight }
	}

	/// Profile of a plain node: no role, no keys, no weight.
	pub fn none() -> Self {
		Self { role: MinerRole::NotAMiner, vrf_pk: Vec::new(), bls_pk: Vec::new(), weight: NO_WEIGHT }
	}
}

/// Identity of a pending operation.
///
/// Every field is SCALE encoded with its own length prefix, so two keys are
/// equal only when all of their parts are equal. `miner_info` carries the
/// encoding of whatever action parameters are not already key fields.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct OperationKey<AccountId> {
	pub org_id: OrgId,
	pub node_id: NodeId,
	pub account: Option<AccountId>,
	pub op_type: OperationType,
	pub miner_info: Vec<u8>,
}

impl<AccountId> OperationKey<AccountId> {
	pub fn new(
		org_id: OrgId,
		node_id: NodeId,
		account: Option<AccountId>,
		op_type: OperationType,
		miner_info: Vec<u8>,
	) -> Self {
		Self { org_id, node_id, account, op_type, miner_info }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_fields_cannot_bleed_into_each_other() {
		let a = OperationKey::<u64>::new(b"ab".to_vec(), b"c".to_vec(), None, OperationType::AddOrg, vec![]);
		let b = OperationKey::<u64>::new(b"a".to_vec(), b"bc".to_vec(), None, OperationType::AddOrg, vec![]);

		assert_ne!(a, b);
		assert_ne!(a.encode(), b.encode());
	}

	#[test]
	fn key_distinguishes_operation_type_and_payload() {
		let base = OperationKey::<u64>::new(b"org".to_vec(), vec![], Some(7), OperationType::SuspendOrg, vec![]);

		let mut other_type = base.clone();
		other_type.op_type = OperationType::RevokeSuspendOrg;
		assert_ne!(base, other_type);

		let mut other_payload = base.clone();
		other_payload.miner_info = vec![1];
		assert_ne!(base, other_payload);

		let decoded = OperationKey::<u64>::decode(&mut &base.encode()[..]).unwrap();
		assert_eq!(decoded, base);
	}

	#[test]
	fn enum_indexes_follow_declared_values() {
		assert_eq!(OrgStatus::PendingSuspensionRevoke.encode(), vec![5]);
		assert_eq!(OperationType::RemoveMiner.encode(), vec![8]);
		assert_eq!(NodeStatusAction::PendingSuspend.encode(), vec![3]);
		assert!(StatusAction::decode(&mut &[0u8][..]).is_err());
	}

	#[test]
	fn access_levels() {
		assert!(!AccessLevel::ReadOnly.grants_vote());
		assert!(AccessLevel::Transact.grants_vote());
		assert!(AccessLevel::ContractDeploy.is_assignable());
		assert!(!AccessLevel::FullAccess.is_assignable());
	}

	#[test]
	fn miner_role_from_raw() {
		assert_eq!(MinerRole::try_from(3u8), Ok(MinerRole::ProposalAndVerifyMiner));
		assert_eq!(MinerRole::try_from(0u8), Ok(MinerRole::NotAMiner));
		assert!(MinerRole::try_from(4u8).is_err());
		assert!(!MinerProfile::none().role.is_miner());
	}
}
