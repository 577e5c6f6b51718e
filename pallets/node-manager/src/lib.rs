#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;


pub mod types;

pub use pallet::*;

const LOG_TARGET: &str = "runtime::node-manager";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::types::NodeDetails;
	use frame_support::pallet_prelude::*;
	use permissioning_primitives::{
		ImplementationResolver, MinerProfile, MinerRole, MinerStatus, NodeId, NodeRegistry, NodeStatus,
		NodeStatusAction, OrgId,
	};
	use sp_std::vec::Vec;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Tells which account is allowed to mutate the registry.
		type Upgradable: ImplementationResolver<Self>;
	}

	#[pallet::storage]
	#[pallet::getter(fn node)]
	pub type Nodes<T: Config> = StorageMap<_, Blake2_128Concat, NodeId, NodeDetails, OptionQuery>;

	/// Node ids in insertion order.
	#[pallet::storage]
	pub type NodeOrder<T: Config> = StorageValue<_, Vec<NodeId>, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		NodeProposed { node_id: NodeId, org_id: OrgId, status: NodeStatus },
		NodeApproved { node_id: NodeId, org_id: OrgId },
		NodePendingDeactivated { node_id: NodeId, org_id: OrgId },
		NodeDeactivated { node_id: NodeId, org_id: OrgId },
		NodeActivated { node_id: NodeId, org_id: OrgId },
		/// A node awaits the vote that makes it a miner.
		MinerProposed { node_id: NodeId, org_id: OrgId, miner_role: MinerRole, weight: u64 },
		MinerApproved { node_id: NodeId, org_id: OrgId, miner_role: MinerRole },
		MinerPendingRemoved { node_id: NodeId, org_id: OrgId },
		MinerRemoved { node_id: NodeId, org_id: OrgId },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Invoker is not the current permissions implementation.
		NotPermissionImpl,
		NodeAlreadyExists,
		NodeNotFound,
		/// The node belongs to another organization.
		NodeOrgMismatch,
		/// The node status does not allow the requested change.
		UnexpectedNodeStatus,
		/// The miner status does not allow the requested change.
		UnexpectedMinerStatus,
		/// The approved role differs from the proposed one.
		MinerRoleMismatch,
		/// Node status cannot change while the node takes part in mining.
		MinerStatusLocked,
	}

	impl<T: Config> Pallet<T> {
		fn ensure_permission_impl(invoker: &T::AccountId) -> DispatchResult {
			ensure!(
				T::Upgradable::permission_impl().as_ref() == Some(invoker),
				Error::<T>::NotPermissionImpl
			);
			Ok(())
		}

		fn insert_node(details: NodeDetails) -> DispatchResult {
			ensure!(!Nodes::<T>::contains_key(&details.node_id), Error::<T>::NodeAlreadyExists);

			NodeOrder::<T>::mutate(|order| order.push(details.node_id.clone()));
			Nodes::<T>::insert(details.node_id.clone(), details);
			Ok(())
		}

		fn node_of(node_id: &NodeId, org_id: &OrgId) -> Result<NodeDetails, DispatchError> {
			let node = Nodes::<T>::get(node_id).ok_or(Error::<T>::NodeNotFound)?;
			ensure!(&node.org_id == org_id, Error::<T>::NodeOrgMismatch);
			Ok(node)
		}

		/// Applies `action` to the in-memory record and returns the event
		/// describing it. Nothing is written.
		fn apply_status_action(
			node: &mut NodeDetails,
			action: NodeStatusAction,
			vote_backed: bool,
		) -> Result<Event<T>, DispatchError> {
			ensure!(
				node.miner_status == MinerStatus::NotValidated ||
					(vote_backed && node.miner_status == MinerStatus::PendingAbolish),
				Error::<T>::MinerStatusLocked
			);

			let node_id = node.node_id.clone();
			let org_id = node.org_id.clone();
			let event = match action {
				NodeStatusAction::Suspend => {
					ensure!(
						matches!(node.status, NodeStatus::Active | NodeStatus::PendingSuspended),
						Error::<T>::UnexpectedNodeStatus
					);
					node.status = NodeStatus::Suspended;
					Event::NodeDeactivated { node_id, org_id }
				},
				NodeStatusAction::RevokeSuspend => {
					ensure!(node.status == NodeStatus::Suspended, Error::<T>::UnexpectedNodeStatus);
					node.status = NodeStatus::Active;
					Event::NodeActivated { node_id, org_id }
				},
				NodeStatusAction::PendingSuspend => {
					ensure!(node.status == NodeStatus::Active, Error::<T>::UnexpectedNodeStatus);
					node.status = NodeStatus::PendingSuspended;
					Event::NodePendingDeactivated { node_id, org_id }
				},
			};

			log::debug!(target: LOG_TARGET, "node {:?} status now {:?}", node.node_id, node.status);
			Ok(event)
		}

		/// All nodes in the order they were added.
		pub fn node_list() -> Vec<NodeDetails> {
			NodeOrder::<T>::get().iter().filter_map(Nodes::<T>::get).collect()
		}

		pub fn node_at(index: u32) -> Option<NodeDetails> {
			NodeOrder::<T>::get().get(index as usize).and_then(Nodes::<T>::get)
		}

		pub fn node_count() -> u32 {
			NodeOrder::<T>::decode_len().unwrap_or_default() as u32
		}

		pub fn node_position(node_id: &NodeId) -> Option<u32> {
			NodeOrder::<T>::get().iter().position(|id| id == node_id).map(|index| index as u32)
		}

		pub fn miner_status(node_id: &NodeId) -> Option<MinerStatus> {
			Nodes::<T>::get(node_id).map(|node| node.miner_status)
		}
	}

	impl<T: Config> NodeRegistry<T> for Pallet<T> {
		fn add_admin_node(invoker: &T::AccountId, node_id: NodeId, org_id: OrgId, miner: MinerProfile) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;

			let role = miner.role;
			let miner_status = if role.is_miner() { MinerStatus::Validated } else { MinerStatus::NotValidated };
			Self::insert_node(NodeDetails::new(node_id.clone(), org_id.clone(), NodeStatus::Active, miner, miner_status))?;

			log::info!(target: LOG_TARGET, "admin node {:?} added with role {:?}", node_id, role);
			if role.is_miner() {
				Self::deposit_event(Event::MinerApproved { node_id, org_id, miner_role: role });
			} else {
				Self::deposit_event(Event::NodeApproved { node_id, org_id });
			}
			Ok(())
		}

		fn add_node(invoker: &T::AccountId, node_id: NodeId, org_id: OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::insert_node(NodeDetails::new(
				node_id.clone(),
				org_id.clone(),
				NodeStatus::PendingApproval,
				MinerProfile::none(),
				MinerStatus::NotValidated,
			))?;

			Self::deposit_event(Event::NodeProposed { node_id, org_id, status: NodeStatus::PendingApproval });
			Ok(())
		}

		fn approve_node(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;
			ensure!(node.status == NodeStatus::PendingApproval, Error::<T>::UnexpectedNodeStatus);

			node.status = NodeStatus::Active;
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(Event::NodeApproved { node_id: node_id.clone(), org_id: org_id.clone() });
			Ok(())
		}

		fn add_org_node(
			invoker: &T::AccountId,
			node_id: NodeId,
			org_id: OrgId,
			miner: MinerProfile,
			add_miner: bool,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;

			let (miner_role, weight) = (miner.role, miner.weight);
			let miner_status = if add_miner { MinerStatus::PendingValidate } else { MinerStatus::NotValidated };
			Self::insert_node(NodeDetails::new(node_id.clone(), org_id.clone(), NodeStatus::Active, miner, miner_status))?;

			if add_miner {
				Self::deposit_event(Event::MinerProposed { node_id, org_id, miner_role, weight });
			} else {
				Self::deposit_event(Event::NodeProposed { node_id, org_id, status: NodeStatus::Active });
			}
			Ok(())
		}

		fn approve_org_node(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId, role: MinerRole) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;
			ensure!(node.miner_role == role, Error::<T>::MinerRoleMismatch);
			ensure!(node.miner_status == MinerStatus::PendingValidate, Error::<T>::UnexpectedMinerStatus);

			node.miner_status = MinerStatus::Validated;
			Nodes::<T>::insert(node_id, node);

			log::info!(target: LOG_TARGET, "miner {:?} validated as {:?}", node_id, role);
			Self::deposit_event(Event::MinerApproved { node_id: node_id.clone(), org_id: org_id.clone(), miner_role: role });
			Ok(())
		}

		fn assign_node_to_miner(
			invoker: &T::AccountId,
			node_id: &NodeId,
			org_id: &OrgId,
			miner: MinerProfile,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;
			ensure!(node.miner_status == MinerStatus::NotValidated, Error::<T>::UnexpectedMinerStatus);

			let (miner_role, weight) = (miner.role, miner.weight);
			node.set_miner(miner);
			node.miner_status = MinerStatus::PendingValidate;
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(Event::MinerProposed { node_id: node_id.clone(), org_id: org_id.clone(), miner_role, weight });
			Ok(())
		}

		fn remove_miner(invoker: &T::AccountId, node_id: &NodeId, org_id: &OrgId, disable_node: bool) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;
			ensure!(node.miner_status == MinerStatus::Validated, Error::<T>::UnexpectedMinerStatus);

			node.miner_status = MinerStatus::PendingAbolish;
			let cascade = if disable_node {
				Some(Self::apply_status_action(&mut node, NodeStatusAction::PendingSuspend, true)?)
			} else {
				None
			};
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(Event::MinerPendingRemoved { node_id: node_id.clone(), org_id: org_id.clone() });
			if let Some(event) = cascade {
				Self::deposit_event(event);
			}
			Ok(())
		}

		fn approve_remove_miner(
			invoker: &T::AccountId,
			node_id: &NodeId,
			org_id: &OrgId,
			disable_node: bool,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;
			ensure!(node.miner_status == MinerStatus::PendingAbolish, Error::<T>::UnexpectedMinerStatus);

			// the cascade still sees the pending abolish status
			let cascade = if disable_node {
				Some(Self::apply_status_action(&mut node, NodeStatusAction::Suspend, true)?)
			} else {
				None
			};
			node.set_miner(MinerProfile::none());
			node.miner_status = MinerStatus::NotValidated;
			Nodes::<T>::insert(node_id, node);

			log::info!(target: LOG_TARGET, "miner {:?} removed", node_id);
			Self::deposit_event(Event::MinerRemoved { node_id: node_id.clone(), org_id: org_id.clone() });
			if let Some(event) = cascade {
				Self::deposit_event(event);
			}
			Ok(())
		}

		fn update_node_status(
			invoker: &T::AccountId,
			node_id: &NodeId,
			org_id: &OrgId,
			action: NodeStatusAction,
			vote_backed: bool,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut node = Self::node_of(node_id, org_id)?;

			let event = Self::apply_status_action(&mut node, action, vote_backed)?;
			Nodes::<T>::insert(node_id, node);

			Self::deposit_event(event);
			Ok(())
		}

		fn node_exists(node_id: &NodeId) -> bool {
			Nodes::<T>::contains_key(node_id)
		}
	}
}
