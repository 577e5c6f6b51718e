//! Governance rules of the network.
//!
//! An [`Implementation`] is addressed by its account id. It accepts calls
//! only from the bound interface (or, for migration, from the upgradable
//! proxy that configured it), authorizes the original caller, and sequences
//! the registry and vote calls each workflow needs.

use crate::{
	pallet::{Config, Error, Event, Implementations, Pallet, PermInterface},
	types::{ImplementationState, Policy},
	upgradable::Upgradable,
	LOG_TARGET,
};
use codec::Encode;
use frame_support::ensure;
use permissioning_primitives::{
	AccessLevel, AccountRegistry, AccountStatus, MinerProfile, NodeId, NodeRegistry, NodeStatusAction,
	OperationKey, OperationType, OrgId, OrgRegistry, OrgStatus, StatusAction, VoteEngine,
};
use sp_runtime::{DispatchError, DispatchResult};
use sp_std::vec::Vec;

pub struct Implementation<T: Config> {
	id: T::AccountId,
}

impl<T: Config> Implementation<T> {
	pub fn at(id: T::AccountId) -> Self {
		Self { id }
	}

	pub fn id(&self) -> &T::AccountId {
		&self.id
	}

	/// One-time setup of a fresh implementation, anchoring it to the
	/// upgradable proxy that may migrate it later.
	pub(crate) fn configure(id: T::AccountId, upgradable: T::AccountId) -> Result<Self, DispatchError> {
		ensure!(!Implementations::<T>::contains_key(&id), Error::<T>::ImplementationAlreadyConfigured);

		Implementations::<T>::insert(&id, ImplementationState { upgradable, policy: Policy::default() });
		log::info!(target: LOG_TARGET, "implementation {:?} configured", id);
		Ok(Self::at(id))
	}

	fn state(&self) -> Result<ImplementationState<T::AccountId>, DispatchError> {
		Implementations::<T>::get(&self.id).ok_or_else(|| Error::<T>::ImplementationNotConfigured.into())
	}

	pub fn policy(&self) -> Result<Policy, DispatchError> {
		self.state().map(|state| state.policy)
	}

	fn mutate_policy(&self, f: impl FnOnce(&mut Policy)) -> DispatchResult {
		Implementations::<T>::try_mutate(&self.id, |maybe_state| -> DispatchResult {
			let state = maybe_state.as_mut().ok_or(Error::<T>::ImplementationNotConfigured)?;
			f(&mut state.policy);
			Ok(())
		})
	}

	fn ensure_from_interface(&self, from: &T::AccountId) -> DispatchResult {
		ensure!(PermInterface::<T>::get().as_ref() == Some(from), Error::<T>::NotFromInterface);
		Ok(())
	}

	fn ensure_not_booted(&self) -> DispatchResult {
		ensure!(!self.policy()?.network_boot, Error::<T>::NetworkAlreadyBooted);
		Ok(())
	}

	/// Bootstrap calls come from the interface on behalf of the guardian,
	/// and only until the network boots.
	fn ensure_bootstrap(&self, from: &T::AccountId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_from_interface(from)?;
		Upgradable::<T>::ensure_guardian(caller)?;
		self.ensure_not_booted()
	}

	fn alliance_admin_org(&self) -> Result<OrgId, DispatchError> {
		self.policy()?.alliance_admin_org.ok_or_else(|| Error::<T>::PolicyNotSet.into())
	}

	fn ensure_alliance_admin(&self, from: &T::AccountId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_from_interface(from)?;
		ensure!(T::AccountManager::is_alliance_admin_account(caller), Error::<T>::NotAllianceAdmin);
		Ok(())
	}

	fn ensure_org_admin(&self, from: &T::AccountId, caller: &T::AccountId, org_id: &OrgId) -> DispatchResult {
		self.ensure_from_interface(from)?;
		ensure!(T::AccountManager::is_org_admin(caller, org_id), Error::<T>::NotOrgAdmin);
		Ok(())
	}

	fn ensure_alliance_admin_org(&self, org_id: &OrgId) -> DispatchResult {
		ensure!(&self.alliance_admin_org()? == org_id, Error::<T>::NotAllianceAdminOrg);
		Ok(())
	}

	fn ensure_org_status(org_id: &OrgId, expected: OrgStatus) -> DispatchResult {
		match T::OrgManager::org_status(org_id) {
			None => Err(Error::<T>::OrgNotFound.into()),
			Some(status) if status == expected => Ok(()),
			Some(_) => Err(Error::<T>::UnexpectedOrgStatus.into()),
		}
	}

	fn miner_key(org_id: &OrgId, node_id: &NodeId, op_type: OperationType, miner: &MinerProfile) -> OperationKey<T::AccountId> {
		let miner_info = (node_id, miner).encode();
		OperationKey::new(org_id.clone(), node_id.clone(), None, op_type, miner_info)
	}

	fn org_key(org_id: &OrgId, node_id: NodeId, account: Option<T::AccountId>, op_type: OperationType) -> OperationKey<T::AccountId> {
		OperationKey::new(org_id.clone(), node_id, account, op_type, Vec::new())
	}

	fn org_status_vote(action: StatusAction) -> (OperationType, OrgStatus) {
		match action {
			StatusAction::Suspend => (OperationType::SuspendOrg, OrgStatus::PendingSuspension),
			StatusAction::RevokeSuspend => (OperationType::RevokeSuspendOrg, OrgStatus::PendingSuspensionRevoke),
		}
	}

	/// Casts `caller`'s vote and reports whether the operation just passed.
	fn vote(&self, key: &OperationKey<T::AccountId>, caller: &T::AccountId) -> Result<bool, DispatchError> {
		let passed = T::VoteManager::approve_item(&self.id, key, caller)?;
		if passed {
			log::info!(target: LOG_TARGET, "{:?} for {:?} executes", key.op_type, key.org_id);
		}
		Ok(passed)
	}

	// -------------------------
	// Wiring
	// -------------------------

	/// Replays the policy of the outgoing implementation.
	pub fn set_migration_policy(&self, from: &T::AccountId, policy: Policy) -> DispatchResult {
		ensure!(self.state()?.upgradable == *from, Error::<T>::NotFromUpgradable);
		self.ensure_not_booted()?;

		self.mutate_policy(|current| *current = policy)
	}

	// -------------------------
	// Bootstrap
	// -------------------------

	pub fn set_policy(&self, from: &T::AccountId, alliance_admin_org: OrgId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_bootstrap(from, caller)?;
		ensure!(self.policy()?.alliance_admin_org.is_none(), Error::<T>::PolicyAlreadySet);

		self.mutate_policy(|policy| policy.alliance_admin_org = Some(alliance_admin_org.clone()))?;
		T::AccountManager::set_alliance_admin_org(&self.id, alliance_admin_org.clone())?;
		T::VoteManager::set_org_id(&self.id, alliance_admin_org.clone())?;

		Pallet::<T>::deposit_event(Event::PolicySet { alliance_admin_org });
		Ok(())
	}

	/// Registers the alliance admin organization itself.
	pub fn init(&self, from: &T::AccountId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_bootstrap(from, caller)?;
		T::OrgManager::add_alliance_admin_org(&self.id, self.alliance_admin_org()?)
	}

	pub fn add_alliance_node(
		&self,
		from: &T::AccountId,
		node_id: NodeId,
		miner: MinerProfile,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_bootstrap(from, caller)?;
		T::NodeManager::add_admin_node(&self.id, node_id, self.alliance_admin_org()?, miner)
	}

	/// Seeds an active, full access alliance admin that also votes.
	pub fn add_alliance_account(&self, from: &T::AccountId, account: T::AccountId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_bootstrap(from, caller)?;
		let org_id = self.alliance_admin_org()?;

		T::AccountManager::assign_alliance_admin(
			&self.id,
			account.clone(),
			org_id.clone(),
			AccessLevel::FullAccess,
			AccountStatus::Active,
		)?;
		T::VoteManager::add_voter(&self.id, &org_id, account)
	}

	pub fn update_network_boot_status(&self, from: &T::AccountId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_bootstrap(from, caller)?;
		self.mutate_policy(|policy| policy.network_boot = true)?;

		log::info!(target: LOG_TARGET, "network booted, bootstrap calls are closed");
		Pallet::<T>::deposit_event(Event::NetworkBooted);
		Ok(())
	}

	// -------------------------
	// Organizations
	// -------------------------

	/// Proposes a new organization together with its first node and admin.
	pub fn add_org(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		ensure!(!T::AccountManager::account_exists(&account), Error::<T>::AccountAlreadyExists);

		let key = Self::org_key(&org_id, node_id.clone(), Some(account.clone()), OperationType::AddOrg);
		T::VoteManager::add_item(&self.id, key)?;
		T::OrgManager::add_org(&self.id, org_id.clone())?;
		T::NodeManager::add_node(&self.id, node_id, org_id.clone())?;
		T::AccountManager::add_account(
			&self.id,
			account,
			org_id,
			AccessLevel::ContractDeploy,
			true,
			AccountStatus::PendingApproval,
		)
	}

	pub fn approve_org(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		Self::ensure_org_status(&org_id, OrgStatus::Proposed)?;

		let key = Self::org_key(&org_id, node_id.clone(), Some(account.clone()), OperationType::AddOrg);
		if self.vote(&key, caller)? {
			T::OrgManager::approve_org(&self.id, &org_id)?;
			T::NodeManager::approve_node(&self.id, &node_id, &org_id)?;
			T::AccountManager::approve_admin(&self.id, &account, &org_id)?;
		}
		Ok(())
	}

	pub fn update_org_status(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		action: StatusAction,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		let (op_type, _) = Self::org_status_vote(action);
		T::OrgManager::update_org_status(&self.id, &org_id, action)?;
		T::VoteManager::add_item(&self.id, Self::org_key(&org_id, Vec::new(), None, op_type))
	}

	pub fn approve_org_status(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		action: StatusAction,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		let (op_type, pending) = Self::org_status_vote(action);
		Self::ensure_org_status(&org_id, pending)?;
		if self.vote(&Self::org_key(&org_id, Vec::new(), None, op_type), caller)? {
			T::OrgManager::approve_org_status(&self.id, &org_id, action)?;
		}
		Ok(())
	}

	// -------------------------
	// Alliance admins
	// -------------------------

	pub fn assign_alliance_admin(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		self.ensure_alliance_admin_org(&org_id)?;

		T::AccountManager::assign_alliance_admin(
			&self.id,
			account.clone(),
			org_id.clone(),
			AccessLevel::FullAccess,
			AccountStatus::PendingApproval,
		)?;
		T::VoteManager::add_item(
			&self.id,
			Self::org_key(&org_id, Vec::new(), Some(account), OperationType::AssignAllianceAdmin),
		)
	}

	pub fn approve_alliance_admin(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		self.ensure_alliance_admin_org(&org_id)?;

		let key = Self::org_key(&org_id, Vec::new(), Some(account.clone()), OperationType::AssignAllianceAdmin);
		if self.vote(&key, caller)? && T::AccountManager::approve_admin(&self.id, &account, &org_id)? {
			T::VoteManager::add_voter(&self.id, &org_id, account)?;
		}
		Ok(())
	}

	pub fn remove_alliance_admin(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		self.ensure_alliance_admin_org(&org_id)?;
		ensure!(T::AccountManager::is_alliance_admin_account(&account), Error::<T>::NotAllianceAdmin);

		T::VoteManager::add_item(
			&self.id,
			Self::org_key(&org_id, Vec::new(), Some(account), OperationType::RemoveAllianceAdmin),
		)
	}

	pub fn approve_remove_alliance_admin(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		self.ensure_alliance_admin_org(&org_id)?;

		let key = Self::org_key(&org_id, Vec::new(), Some(account.clone()), OperationType::RemoveAllianceAdmin);
		if self.vote(&key, caller)? {
			T::AccountManager::revoke_alliance_admin(&self.id, &account, &org_id)?;
			if T::VoteManager::is_active_voter(&account) {
				T::VoteManager::delete_voter(&self.id, &org_id, &account)?;
			}
		}
		Ok(())
	}

	// -------------------------
	// Miners
	// -------------------------

	pub fn add_miner_node(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		miner: MinerProfile,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		ensure!(miner.role.is_miner(), Error::<T>::InvalidMinerRole);
		Self::ensure_org_status(&org_id, OrgStatus::Approved)?;

		let key = Self::miner_key(&org_id, &node_id, OperationType::AddMinerNode, &miner);
		T::NodeManager::add_org_node(&self.id, node_id, org_id, miner, true)?;
		T::VoteManager::add_item(&self.id, key)
	}

	pub fn approve_miner_node(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		miner: MinerProfile,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		let key = Self::miner_key(&org_id, &node_id, OperationType::AddMinerNode, &miner);
		if self.vote(&key, caller)? {
			T::NodeManager::approve_org_node(&self.id, &node_id, &org_id, miner.role)?;
		}
		Ok(())
	}

	pub fn assign_node_to_miner(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		miner: MinerProfile,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;
		ensure!(miner.role.is_miner(), Error::<T>::InvalidMinerRole);

		let key = Self::miner_key(&org_id, &node_id, OperationType::AssignNodeToMiner, &miner);
		T::NodeManager::assign_node_to_miner(&self.id, &node_id, &org_id, miner)?;
		T::VoteManager::add_item(&self.id, key)
	}

	pub fn approve_node_to_miner(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		miner: MinerProfile,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		let key = Self::miner_key(&org_id, &node_id, OperationType::AssignNodeToMiner, &miner);
		if self.vote(&key, caller)? {
			T::NodeManager::approve_org_node(&self.id, &node_id, &org_id, miner.role)?;
		}
		Ok(())
	}

	fn remove_miner_key(org_id: &OrgId, node_id: &NodeId, disable_node: bool) -> OperationKey<T::AccountId> {
		OperationKey::new(org_id.clone(), node_id.clone(), None, OperationType::RemoveMiner, disable_node.encode())
	}

	pub fn remove_miner(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		disable_node: bool,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		T::VoteManager::add_item(&self.id, Self::remove_miner_key(&org_id, &node_id, disable_node))?;
		T::NodeManager::remove_miner(&self.id, &node_id, &org_id, disable_node)
	}

	pub fn approve_remove_miner(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		disable_node: bool,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_alliance_admin(from, caller)?;

		if self.vote(&Self::remove_miner_key(&org_id, &node_id, disable_node), caller)? {
			T::NodeManager::approve_remove_miner(&self.id, &node_id, &org_id, disable_node)?;
		}
		Ok(())
	}

	// -------------------------
	// Organization admin actions
	// -------------------------

	pub fn add_account(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		access: AccessLevel,
		is_org_admin: bool,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_org_admin(from, caller, &org_id)?;
		Self::ensure_org_status(&org_id, OrgStatus::Approved)?;
		ensure!(!T::AccountManager::account_exists(&account), Error::<T>::AccountAlreadyExists);

		T::AccountManager::add_account(&self.id, account, org_id, access, is_org_admin, AccountStatus::Active)
	}

	pub fn update_account_status(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		action: StatusAction,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_org_admin(from, caller, &org_id)?;
		T::AccountManager::update_account_status(&self.id, &account, &org_id, action)
	}

	pub fn update_account_access(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		account: T::AccountId,
		access: AccessLevel,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_org_admin(from, caller, &org_id)?;
		T::AccountManager::update_account_access(&self.id, &account, &org_id, access)
	}

	pub fn add_node(&self, from: &T::AccountId, org_id: OrgId, node_id: NodeId, caller: &T::AccountId) -> DispatchResult {
		self.ensure_org_admin(from, caller, &org_id)?;
		Self::ensure_org_status(&org_id, OrgStatus::Approved)?;

		T::NodeManager::add_org_node(&self.id, node_id, org_id, MinerProfile::none(), false)
	}

	pub fn update_node_status(
		&self,
		from: &T::AccountId,
		org_id: OrgId,
		node_id: NodeId,
		action: NodeStatusAction,
		caller: &T::AccountId,
	) -> DispatchResult {
		self.ensure_org_admin(from, caller, &org_id)?;
		ensure!(action != NodeStatusAction::PendingSuspend, Error::<T>::InvalidStatusAction);

		T::NodeManager::update_node_status(&self.id, &node_id, &org_id, action, false)
	}
}
