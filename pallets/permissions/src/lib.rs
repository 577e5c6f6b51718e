//! # Permissions Pallet
//!
//! Entry point of network governance. Every dispatchable here acts as the
//! public interface: it takes the signed origin as the caller and forwards
//! it to the implementation the interface is currently bound to. The
//! implementation authorizes the caller and drives the organization,
//! account, node and vote registries, which are wired in through `Config`.
//!
//! The guardian (set at genesis) binds the interface once with
//! [`Pallet::init`] and may later hand governance to a fresh implementation
//! with [`Pallet::change_impl`]; the network policy moves along with it.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;


pub mod implementation;
pub mod interface;
pub mod types;
pub mod upgradable;

pub use pallet::*;

const LOG_TARGET: &str = "runtime::permissions";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::{
		implementation::Implementation,
		interface::Interface,
		types::{GenesisNode, ImplementationState, Policy},
		upgradable::Upgradable,
	};
	use frame_support::{pallet_prelude::*, PalletId};
	use frame_system::pallet_prelude::*;
	use permissioning_primitives::{
		AccessLevel, AccountRegistry, MinerProfile, MinerRole, NodeId, NodeRegistry, NodeStatusAction, OrgId,
		OrgRegistry, StatusAction, VoteEngine,
	};
	use sp_std::vec::Vec;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Source of the account the upgradable proxy acts as.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		type OrgManager: OrgRegistry<Self>;

		type AccountManager: AccountRegistry<Self>;

		type NodeManager: NodeRegistry<Self>;

		type VoteManager: VoteEngine<Self>;
	}

	/// Account allowed to initialize and upgrade the permission stack.
	#[pallet::storage]
	#[pallet::getter(fn guardian)]
	pub type Guardian<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	#[pallet::storage]
	pub type InitDone<T: Config> = StorageValue<_, bool, ValueQuery>;

	/// Implementation the registries take orders from.
	#[pallet::storage]
	#[pallet::getter(fn perm_impl)]
	pub type PermImpl<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	/// Identity of the public interface.
	#[pallet::storage]
	#[pallet::getter(fn perm_interface)]
	pub type PermInterface<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	/// Only account allowed to rebind the interface.
	#[pallet::storage]
	pub type InterfaceUpgradable<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	/// Implementation the interface forwards to.
	#[pallet::storage]
	pub type InterfaceImpl<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

	/// State of every implementation ever configured.
	#[pallet::storage]
	#[pallet::getter(fn implementation_state)]
	pub type Implementations<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, ImplementationState<T::AccountId>, OptionQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		pub guardian: Option<T::AccountId>,
		/// Interface and implementation to bind at genesis, if any.
		pub perm_interface: Option<T::AccountId>,
		pub perm_impl: Option<T::AccountId>,
		pub alliance_admin_org: Vec<u8>,
		/// Full access alliance admins, each registered as a voter.
		pub alliance_accounts: Vec<T::AccountId>,
		pub alliance_nodes: Vec<GenesisNode>,
		/// Close the bootstrap calls once the above is in place.
		pub network_boot: bool,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			if let Some(guardian) = &self.guardian {
				Guardian::<T>::put(guardian);
			}

			if let (Some(perm_interface), Some(perm_impl)) = (&self.perm_interface, &self.perm_impl) {
				Pallet::<T>::bootstrap_network(self, perm_interface.clone(), perm_impl.clone())
					.expect("permission genesis must describe a valid network");
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		UpgradableInitialized { perm_interface: T::AccountId, perm_impl: T::AccountId },
		ImplementationChanged { old_impl: T::AccountId, new_impl: T::AccountId },
		PolicySet { alliance_admin_org: OrgId },
		/// Bootstrap is over; only governed changes from now on.
		NetworkBooted,
	}

	#[pallet::error]
	pub enum Error<T> {
		NotGuardian,
		AlreadyInitialized,
		NotInitialized,
		/// The interface does not forward to any implementation yet.
		InterfaceNotBound,
		NotFromInterface,
		NotFromUpgradable,
		ImplementationAlreadyConfigured,
		ImplementationNotConfigured,
		NetworkAlreadyBooted,
		PolicyNotSet,
		PolicyAlreadySet,
		/// Caller is not an active member of the alliance admin organization.
		NotAllianceAdmin,
		/// Caller is not an active admin of the target organization.
		NotOrgAdmin,
		NotAllianceAdminOrg,
		OrgNotFound,
		UnexpectedOrgStatus,
		AccountAlreadyExists,
		/// Miner proposals need an actual miner role.
		InvalidMinerRole,
		/// Organization admins may only suspend or reactivate nodes.
		InvalidStatusAction,
		/// A genesis node carries an unknown miner role.
		InvalidGenesisNode,
	}

	impl<T: Config> Pallet<T> {
		/// Runs the same sequence a guardian would submit right after launch.
		pub(crate) fn bootstrap_network(
			config: &GenesisConfig<T>,
			perm_interface: T::AccountId,
			perm_impl: T::AccountId,
		) -> DispatchResult {
			let guardian = Guardian::<T>::get().ok_or(Error::<T>::NotGuardian)?;
			Upgradable::<T>::init(&guardian, perm_interface, perm_impl)?;

			let (from, implementation) = Interface::<T>::bound()?;
			implementation.set_policy(&from, config.alliance_admin_org.clone(), &guardian)?;
			implementation.init(&from, &guardian)?;

			for account in &config.alliance_accounts {
				implementation.add_alliance_account(&from, account.clone(), &guardian)?;
			}
			for (node_id, role, vrf_pk, bls_pk, weight) in &config.alliance_nodes {
				let role = MinerRole::try_from(*role).map_err(|_| {
					log::warn!(target: LOG_TARGET, "genesis node {:?} has unknown role {}", node_id, role);
					Error::<T>::InvalidGenesisNode
				})?;
				let miner = MinerProfile::new(role, vrf_pk.clone(), bls_pk.clone(), *weight);
				implementation.add_alliance_node(&from, node_id.clone(), miner, &guardian)?;
			}

			if config.network_boot {
				implementation.update_network_boot_status(&from, &guardian)?;
			}
			Ok(())
		}

		/// Policy of the implementation currently in charge.
		pub fn policy() -> Option<Policy> {
			Upgradable::<T>::current().ok().and_then(|id| Implementation::<T>::at(id).policy().ok())
		}

		/// Account the upgradable proxy acts as.
		pub fn upgradable_account() -> T::AccountId {
			Upgradable::<T>::account_id()
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Binds the interface to its first implementation. Guardian only, once.
		#[pallet::call_index(0)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(3, 6))]
		pub fn init(origin: OriginFor<T>, perm_interface: T::AccountId, perm_impl: T::AccountId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Upgradable::<T>::init(&who, perm_interface, perm_impl)
		}

		/// Hands governance to `new_impl`, carrying the current policy over.
		#[pallet::call_index(1)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(5, 4))]
		pub fn change_impl(origin: OriginFor<T>, new_impl: T::AccountId) -> DispatchResult {
			let who = ensure_signed(origin)?;
			Upgradable::<T>::change_impl(&who, new_impl)
		}

		#[pallet::call_index(2)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(4, 3))]
		pub fn set_policy(origin: OriginFor<T>, alliance_admin_org: OrgId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.set_policy(&from, alliance_admin_org, &caller)
		}

		/// Registers the alliance admin organization named by the policy.
		#[pallet::call_index(3)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(5, 3))]
		pub fn init_alliance_org(origin: OriginFor<T>) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.init(&from, &caller)
		}

		#[pallet::call_index(4)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(5, 2))]
		pub fn add_alliance_node(origin: OriginFor<T>, node_id: NodeId, miner: MinerProfile) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_alliance_node(&from, node_id, miner, &caller)
		}

		#[pallet::call_index(5)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(6, 6))]
		pub fn add_alliance_account(origin: OriginFor<T>, account: T::AccountId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_alliance_account(&from, account, &caller)
		}

		/// Closes the bootstrap calls for good.
		#[pallet::call_index(6)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(4, 1))]
		pub fn update_network_boot_status(origin: OriginFor<T>) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.update_network_boot_status(&from, &caller)
		}

		/// Proposes `org_id` with its first node and admin account.
		#[pallet::call_index(7)]
		#[pallet::weight(Weight::from_parts(30_000, 0) + T::DbWeight::get().reads_writes(8, 9))]
		pub fn add_org(origin: OriginFor<T>, org_id: OrgId, node_id: NodeId, account: T::AccountId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_org(&from, org_id, node_id, account, &caller)
		}

		#[pallet::call_index(8)]
		#[pallet::weight(Weight::from_parts(30_000, 0) + T::DbWeight::get().reads_writes(9, 7))]
		pub fn approve_org(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			account: T::AccountId,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_org(&from, org_id, node_id, account, &caller)
		}

		#[pallet::call_index(9)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 3))]
		pub fn update_org_status(origin: OriginFor<T>, org_id: OrgId, action: StatusAction) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.update_org_status(&from, org_id, action, &caller)
		}

		#[pallet::call_index(10)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(7, 5))]
		pub fn approve_org_status(origin: OriginFor<T>, org_id: OrgId, action: StatusAction) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_org_status(&from, org_id, action, &caller)
		}

		#[pallet::call_index(11)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 4))]
		pub fn assign_alliance_admin(origin: OriginFor<T>, org_id: OrgId, account: T::AccountId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.assign_alliance_admin(&from, org_id, account, &caller)
		}

		#[pallet::call_index(12)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(8, 8))]
		pub fn approve_alliance_admin(origin: OriginFor<T>, org_id: OrgId, account: T::AccountId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_alliance_admin(&from, org_id, account, &caller)
		}

		#[pallet::call_index(13)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 2))]
		pub fn remove_alliance_admin(origin: OriginFor<T>, org_id: OrgId, account: T::AccountId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.remove_alliance_admin(&from, org_id, account, &caller)
		}

		#[pallet::call_index(14)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(8, 6))]
		pub fn approve_remove_alliance_admin(
			origin: OriginFor<T>,
			org_id: OrgId,
			account: T::AccountId,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_remove_alliance_admin(&from, org_id, account, &caller)
		}

		#[pallet::call_index(15)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 4))]
		pub fn add_miner_node(origin: OriginFor<T>, org_id: OrgId, node_id: NodeId, miner: MinerProfile) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_miner_node(&from, org_id, node_id, miner, &caller)
		}

		#[pallet::call_index(16)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 5))]
		pub fn approve_miner_node(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			miner: MinerProfile,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_miner_node(&from, org_id, node_id, miner, &caller)
		}

		#[pallet::call_index(17)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 3))]
		pub fn assign_node_to_miner(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			miner: MinerProfile,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.assign_node_to_miner(&from, org_id, node_id, miner, &caller)
		}

		#[pallet::call_index(18)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 5))]
		pub fn approve_node_to_miner(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			miner: MinerProfile,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_node_to_miner(&from, org_id, node_id, miner, &caller)
		}

		#[pallet::call_index(19)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 3))]
		pub fn remove_miner(origin: OriginFor<T>, org_id: OrgId, node_id: NodeId, disable_node: bool) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.remove_miner(&from, org_id, node_id, disable_node, &caller)
		}

		#[pallet::call_index(20)]
		#[pallet::weight(Weight::from_parts(20_000, 0) + T::DbWeight::get().reads_writes(6, 5))]
		pub fn approve_remove_miner(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			disable_node: bool,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.approve_remove_miner(&from, org_id, node_id, disable_node, &caller)
		}

		/// Adds an active account to an approved organization. Org admins only.
		#[pallet::call_index(21)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(6, 3))]
		pub fn add_account(
			origin: OriginFor<T>,
			org_id: OrgId,
			account: T::AccountId,
			access: AccessLevel,
			is_org_admin: bool,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_account(&from, org_id, account, access, is_org_admin, &caller)
		}

		#[pallet::call_index(22)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(5, 1))]
		pub fn update_account_status(
			origin: OriginFor<T>,
			org_id: OrgId,
			account: T::AccountId,
			action: StatusAction,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.update_account_status(&from, org_id, account, action, &caller)
		}

		#[pallet::call_index(23)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(5, 1))]
		pub fn update_account_access(
			origin: OriginFor<T>,
			org_id: OrgId,
			account: T::AccountId,
			access: AccessLevel,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.update_account_access(&from, org_id, account, access, &caller)
		}

		/// Adds an active, non mining node to an approved organization.
		#[pallet::call_index(24)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(6, 2))]
		pub fn add_node(origin: OriginFor<T>, org_id: OrgId, node_id: NodeId) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.add_node(&from, org_id, node_id, &caller)
		}

		#[pallet::call_index(25)]
		#[pallet::weight(Weight::from_parts(10_000, 0) + T::DbWeight::get().reads_writes(5, 1))]
		pub fn update_node_status(
			origin: OriginFor<T>,
			org_id: OrgId,
			node_id: NodeId,
			action: NodeStatusAction,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let (from, implementation) = Interface::<T>::bound()?;
			implementation.update_node_status(&from, org_id, node_id, action, &caller)
		}
	}
}
