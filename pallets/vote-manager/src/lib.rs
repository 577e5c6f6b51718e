#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;


pub mod types;

pub use pallet::*;

const LOG_TARGET: &str = "runtime::vote-manager";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::types::{VoterDetails, VotingOperation};
	use frame_support::pallet_prelude::*;
	use permissioning_primitives::{ImplementationResolver, NodeId, OperationKey, OperationType, OrgId, VoteEngine};
	use sp_std::vec::Vec;

	#[pallet::pallet]
	#[pallet::without_storage_info]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Tells which account is allowed to drive the votes.
		type Upgradable: ImplementationResolver<Self>;
	}

	/// Organization every voter must belong to.
	#[pallet::storage]
	#[pallet::getter(fn voter_org)]
	pub type VoterOrg<T: Config> = StorageValue<_, OrgId, OptionQuery>;

	#[pallet::storage]
	#[pallet::getter(fn voter)]
	pub type Voters<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, VoterDetails<T::AccountId>, OptionQuery>;

	/// Voters in registration order.
	#[pallet::storage]
	pub type VoterOrder<T: Config> = StorageValue<_, Vec<T::AccountId>, ValueQuery>;

	/// Voters ever registered, active or not.
	#[pallet::storage]
	#[pallet::getter(fn total_voter_count)]
	pub type TotalVoterCount<T: Config> = StorageValue<_, u32, ValueQuery>;

	/// Voters currently active. Majorities are computed against this.
	#[pallet::storage]
	#[pallet::getter(fn valid_voter_count)]
	pub type ValidVoterCount<T: Config> = StorageValue<_, u32, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn pending_operation)]
	pub type PendingOperations<T: Config> = StorageMap<
		_,
		Blake2_128Concat,
		OperationKey<T::AccountId>,
		VotingOperation<T::AccountId>,
		OptionQuery,
	>;

	/// Pending operation keys in submission order.
	#[pallet::storage]
	pub type PendingOrder<T: Config> = StorageValue<_, Vec<OperationKey<T::AccountId>>, ValueQuery>;

	/// Append-only record of passed operations.
	#[pallet::storage]
	#[pallet::getter(fn passed_operation)]
	pub type PassedOperations<T: Config> =
		StorageMap<_, Twox64Concat, u32, VotingOperation<T::AccountId>, OptionQuery>;

	#[pallet::storage]
	#[pallet::getter(fn passed_count)]
	pub type PassedCount<T: Config> = StorageValue<_, u32, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		VoterAdded { org_id: OrgId, account: T::AccountId },
		VoterDeleted { org_id: OrgId, account: T::AccountId },
		VotingItemAdded { org_id: OrgId, node_id: NodeId, account: Option<T::AccountId>, op_type: OperationType },
		VotingProcessed {
			org_id: OrgId,
			node_id: NodeId,
			account: Option<T::AccountId>,
			op_type: OperationType,
			voter: T::AccountId,
		},
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Invoker is not the current permissions implementation.
		NotPermissionImpl,
		/// Voters can only come from the alliance admin organization.
		NotVoterOrg,
		VoterAlreadyExists,
		VoterNotFound,
		VoterAlreadyInactive,
		/// Only active voters may approve operations.
		NotActiveVoter,
		/// The same operation is already waiting for votes.
		PendingOperationExists,
		PendingOperationNotFound,
		AlreadyVoted,
	}

	impl<T: Config> Pallet<T> {
		fn ensure_permission_impl(invoker: &T::AccountId) -> DispatchResult {
			ensure!(
				T::Upgradable::permission_impl().as_ref() == Some(invoker),
				Error::<T>::NotPermissionImpl
			);
			Ok(())
		}

		fn ensure_voter_org(org_id: &OrgId) -> DispatchResult {
			ensure!(VoterOrg::<T>::get().as_ref() == Some(org_id), Error::<T>::NotVoterOrg);
			Ok(())
		}

		/// Moves a pending operation that just reached its majority into the
		/// passed record.
		fn pass(mut operation: VotingOperation<T::AccountId>) {
			operation.passed = true;
			PendingOperations::<T>::remove(&operation.key);
			PendingOrder::<T>::mutate(|order| order.retain(|key| key != &operation.key));

			let index = PassedCount::<T>::get();
			log::info!(
				target: LOG_TARGET,
				"{:?} on {:?} passed with {} votes",
				operation.key.op_type,
				operation.key.org_id,
				operation.voted_count
			);
			PassedOperations::<T>::insert(index, operation);
			PassedCount::<T>::put(index.saturating_add(1));
		}

		/// Pending operations in submission order.
		pub fn pending_operations() -> Vec<VotingOperation<T::AccountId>> {
			PendingOrder::<T>::get().iter().filter_map(PendingOperations::<T>::get).collect()
		}

		pub fn pending_count() -> u32 {
			PendingOrder::<T>::decode_len().unwrap_or_default() as u32
		}

		pub fn pending_position(key: &OperationKey<T::AccountId>) -> Option<u32> {
			PendingOrder::<T>::get().iter().position(|k| k == key).map(|index| index as u32)
		}

		/// Passed operations in the order they passed.
		pub fn passed_operations() -> Vec<VotingOperation<T::AccountId>> {
			(0..PassedCount::<T>::get()).filter_map(PassedOperations::<T>::get).collect()
		}

		pub fn voter_list() -> Vec<VoterDetails<T::AccountId>> {
			VoterOrder::<T>::get().iter().filter_map(Voters::<T>::get).collect()
		}
	}

	impl<T: Config> VoteEngine<T> for Pallet<T> {
		fn set_org_id(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			VoterOrg::<T>::put(org_id);
			Ok(())
		}

		fn add_voter(invoker: &T::AccountId, org_id: &OrgId, account: T::AccountId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::ensure_voter_org(org_id)?;
			ensure!(!Voters::<T>::contains_key(&account), Error::<T>::VoterAlreadyExists);

			Voters::<T>::insert(&account, VoterDetails { account: account.clone(), active: true });
			VoterOrder::<T>::mutate(|order| order.push(account.clone()));
			TotalVoterCount::<T>::mutate(|count| *count = count.saturating_add(1));
			ValidVoterCount::<T>::mutate(|count| *count = count.saturating_add(1));

			log::debug!(target: LOG_TARGET, "voter {:?} added", account);
			Self::deposit_event(Event::VoterAdded { org_id: org_id.clone(), account });
			Ok(())
		}

		fn delete_voter(invoker: &T::AccountId, org_id: &OrgId, account: &T::AccountId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::ensure_voter_org(org_id)?;

			Voters::<T>::try_mutate(account, |maybe_voter| -> DispatchResult {
				let voter = maybe_voter.as_mut().ok_or(Error::<T>::VoterNotFound)?;
				ensure!(voter.active, Error::<T>::VoterAlreadyInactive);
				voter.active = false;
				Ok(())
			})?;
			ValidVoterCount::<T>::mutate(|count| *count = count.saturating_sub(1));

			log::debug!(target: LOG_TARGET, "voter {:?} deactivated", account);
			Self::deposit_event(Event::VoterDeleted { org_id: org_id.clone(), account: account.clone() });
			Ok(())
		}

		fn add_item(invoker: &T::AccountId, key: OperationKey<T::AccountId>) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(!PendingOperations::<T>::contains_key(&key), Error::<T>::PendingOperationExists);

			PendingOrder::<T>::mutate(|order| order.push(key.clone()));
			PendingOperations::<T>::insert(&key, VotingOperation::new(key.clone()));

			Self::deposit_event(Event::VotingItemAdded {
				org_id: key.org_id,
				node_id: key.node_id,
				account: key.account,
				op_type: key.op_type,
			});
			Ok(())
		}

		fn approve_item(
			invoker: &T::AccountId,
			key: &OperationKey<T::AccountId>,
			voter: &T::AccountId,
		) -> Result<bool, DispatchError> {
			Self::ensure_permission_impl(invoker)?;
			ensure!(Self::is_active_voter(voter), Error::<T>::NotActiveVoter);

			let mut operation = PendingOperations::<T>::get(key).ok_or(Error::<T>::PendingOperationNotFound)?;
			ensure!(!operation.has_voted(voter), Error::<T>::AlreadyVoted);

			operation.voted_accounts.push(voter.clone());
			operation.voted_count = operation.voted_count.saturating_add(1);

			Self::deposit_event(Event::VotingProcessed {
				org_id: key.org_id.clone(),
				node_id: key.node_id.clone(),
				account: key.account.clone(),
				op_type: key.op_type,
				voter: voter.clone(),
			});

			if operation.reached_majority(ValidVoterCount::<T>::get()) {
				Self::pass(operation);
				return Ok(true);
			}

			PendingOperations::<T>::insert(key, operation);
			Ok(false)
		}

		fn is_active_voter(account: &T::AccountId) -> bool {
			Voters::<T>::get(account).map_or(false, |voter| voter.active)
		}
	}
}
