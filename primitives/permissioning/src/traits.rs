use crate::types::*;
use sp_runtime::{DispatchError, DispatchResult};

/// Resolves which account currently acts as the permissions implementation.
///
/// Every registry compares the invoker of a mutating call against this
/// identity before touching storage.
pub trait ImplementationResolver<T: frame_system::Config> {
	fn permission_impl() -> Option<T::AccountId>;
}

pub trait OrgRegistry<T: frame_system::Config> {
	fn add_alliance_admin_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult;

	fn add_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult;

	fn approve_org(invoker: &T::AccountId, org_id: &OrgId) -> DispatchResult;

	fn update_org_status(invoker: &T::AccountId, org_id: &OrgId, action: StatusAction) -> DispatchResult;

	fn approve_org_status(invoker: &T::AccountId, org_id: &OrgId, action: StatusAction) -> DispatchResult;

	fn org_status(org_id: &OrgId) -> Option<OrgStatus>;
}

pub trait AccountRegistry<T: frame_system::Config> {
	fn set_alliance_admin_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult;

	fn add_account(
		invoker: &T::AccountId,
		account: T::AccountId,
		org_id: OrgId,
		access: AccessLevel,
		is_org_admin: bool,
		status: AccountStatus,
	) -> DispatchResult;

	fn assign_alliance_admin(
		invoker: &T::AccountId,
		account: T::AccountId,
		org_id: OrgId,
		access: AccessLevel,
		status: AccountStatus,
	) -> DispatchResult;

	/// Activates an admin account. Returns whether it belongs to the
	/// alliance admin organization.
	fn approve_admin(invoker: &T::AccountId, account: &T::AccountId, org_id: &OrgId) -> Result<bool, DispatchError>;

	fn update_account_status(
		invoker: &T::AccountId,
		account: &T::AccountId,
		org_id: &OrgId,
		action: StatusAction,
	) -> DispatchResult;

	fn update_account_access(
		invoker: &T::AccountId,
		account: &T::AccountId,
		org_id: &OrgId,
		access: AccessLevel,
	) -> DispatchResult;

	fn revoke_alliance_admin(invoker: &T::AccountId, account: &T::AccountId, org_id: &OrgId) -> DispatchResult;

	fn account_exists(account: &T::AccountId) -> bool;

	fn is_org_admin(account: &T::AccountId, org_id: &OrgId) -> bool;

	fn is_alliance_admin_account(account: &T::AccountId) -> bool;
}

pub trait NodeRegistry<T: frame_system::Config> {
	fn add_admin_node(invoker: &T::AccountId, node_id: NodeId, org_id: OrgId, miner: MinerProfile) -> DispatchResult;

	fn add_node(invoker: &T::AccountId, node_id: NodeId, org_id: OrgId) -> DispatchResult;

	fn approve_node(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId) -> DispatchResult;

	fn add_org_node(
		invoker: &T::AccountId,
		node_id: NodeId,
		org_id: OrgId,
		miner: MinerProfile,
		add_miner: bool,
	) -> DispatchResult;

	fn approve_org_node(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId, role: MinerRole) -> DispatchResult;

	fn assign_node_to_miner(
		invoker: &T::AccountId,
		node_id: &NodeId,
		org_id: &OrgId,
		miner: MinerProfile,
	) -> DispatchResult;

	fn remove_miner(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId, disable_node: bool) -> DispatchResult;

	fn approve_remove_miner(
		invoker: &T::AccountId,
		node_id: &NodeId,
		org_id: &OrgId,
		disable_node: bool,
	) -> DispatchResult;

	/// `vote_backed` is set when the change follows a passed miner removal.
	fn update_node_status(
		invoker: &T::AccountId,
		node_id: &NodeId,
		org_id: &OrgId,
		action: NodeStatusAction,
		vote_backed: bool,
	) -> DispatchResult;

	fn node_exists(node_id: &NodeId) -> bool;
}

pub trait VoteEngine<T: frame_system::Config> {
	fn set_org_id(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult;

	fn add_voter(invoker: &T::AccountId, org_id: &OrgId, account: T::AccountId) -> DispatchResult;

	fn delete_voter(invoker: &T::AccountId, org_id: &OrgId, account: &T::AccountId) -> DispatchResult;

	fn add_item(invoker: &T::AccountId, key: OperationKey<T::AccountId>) -> DispatchResult;

	/// Records `voter`'s approval. Returns `true` only for the vote that
	/// makes the operation pass.
	fn approve_item(
		invoker: &T::AccountId,
		key: &OperationKey<T::AccountId>,
		voter: &T::AccountId,
	) -> Result<bool, DispatchError>;

	fn is_active_voter(account: &T::AccountId) -> bool;
}
