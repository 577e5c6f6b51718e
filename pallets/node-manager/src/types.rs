use codec::{Decode, Encode};
use permissioning_primitives::{MinerProfile, MinerRole, MinerStatus, NodeId, NodeStatus, OrgId, PublicKey};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct NodeDetails {
	pub node_id: NodeId,
	pub org_id: OrgId,
	pub status: NodeStatus,
	pub miner_role: MinerRole,
	pub vrf_pk: PublicKey,
	pub bls_pk: PublicKey,
	pub weight: u64,
	pub miner_status: MinerStatus,
}

impl NodeDetails {
	pub fn new(node_id: NodeId, org_id: OrgId, status: NodeStatus, miner: MinerProfile, miner_status: MinerStatus) -> Self {
		Self {
			node_id,
			org_id,
			status,
			miner_role: miner.role,
			vrf_pk: miner.vrf_pk,
			bls_pk: miner.bls_pk,
			weight: miner.weight,
			miner_status,
		}
	}

	pub fn set_miner(&mut self, miner: MinerProfile) {
		self.miner_role = miner.role;
		self.vrf_pk = miner.vrf_pk;
		self.bls_pk = miner.bls_pk;
		self.weight = miner.weight;
	}
}
