#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;

#[cfg(test)]
mod tests;

pub mod types;

pub use pallet::*;

const LOG_TARGET: &str = "runtime::org-manager";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::types::OrgDetails;
	use frame_support::pallet_prelude::*;
	use permissioning_primitives::{ImplementationResolver, OrgId, OrgRegistry, OrgStatus, StatusAction};
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

	/// The single organization whose members govern the network.
	#[pallet::storage]
	#[pallet::getter(fn alliance_admin_org)]
	pub type AllianceAdminOrg<T: Config> = StorageValue<_, OrgId, OptionQuery>;

	#[pallet::storage]
	#[pallet::getter(fn org)]
	pub type Orgs<T: Config> = StorageMap<_, Blake2_128Concat, OrgId, OrgDetails, OptionQuery>;

	/// Organization ids in insertion order.
	#[pallet::storage]
	pub type OrgOrder<T: Config> = StorageValue<_, Vec<OrgId>, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		/// An organization entered a state that awaits approval.
		OrgPendingApproval { org_id: OrgId, status: OrgStatus },
		OrgApproved { org_id: OrgId, status: OrgStatus },
		OrgSuspended { org_id: OrgId, status: OrgStatus },
		OrgSuspensionRevoked { org_id: OrgId, status: OrgStatus },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Invoker is not the current permissions implementation.
		NotPermissionImpl,
		OrgAlreadyExists,
		OrgNotFound,
		/// The alliance admin organization can only be set once.
		AllianceAdminOrgAlreadySet,
		/// The alliance admin organization cannot be suspended.
		AllianceAdminOrgImmutable,
		/// The organization is not in the state the request applies to.
		UnexpectedOrgStatus,
	}

	impl<T: Config> Pallet<T> {
		fn ensure_permission_impl(invoker: &T::AccountId) -> DispatchResult {
			ensure!(
				T::Upgradable::permission_impl().as_ref() == Some(invoker),
				Error::<T>::NotPermissionImpl
			);
			Ok(())
		}

		fn insert_org(org_id: OrgId, status: OrgStatus) -> DispatchResult {
			ensure!(!Orgs::<T>::contains_key(&org_id), Error::<T>::OrgAlreadyExists);

			Orgs::<T>::insert(&org_id, OrgDetails { org_id: org_id.clone(), status });
			OrgOrder::<T>::mutate(|order| order.push(org_id));
			Ok(())
		}

		fn transition(org_id: &OrgId, from: OrgStatus, to: OrgStatus) -> DispatchResult {
			Orgs::<T>::try_mutate(org_id, |maybe_org| -> DispatchResult {
				let org = maybe_org.as_mut().ok_or(Error::<T>::OrgNotFound)?;
				ensure!(org.status == from, Error::<T>::UnexpectedOrgStatus);
				org.status = to;
				Ok(())
			})?;

			log::debug!(target: LOG_TARGET, "org {:?}: {:?} -> {:?}", org_id, from, to);
			Ok(())
		}

		fn ensure_not_alliance_admin_org(org_id: &OrgId) -> DispatchResult {
			ensure!(
				AllianceAdminOrg::<T>::get().as_ref() != Some(org_id),
				Error::<T>::AllianceAdminOrgImmutable
			);
			Ok(())
		}

		/// Whether `org_id` is registered with exactly `status`.
		pub fn check_org_status(org_id: &OrgId, status: OrgStatus) -> bool {
			Orgs::<T>::get(org_id).map_or(false, |org| org.status == status)
		}

		/// All organizations in the order they were added.
		pub fn org_list() -> Vec<OrgDetails> {
			OrgOrder::<T>::get().iter().filter_map(Orgs::<T>::get).collect()
		}

		pub fn org_count() -> u32 {
			OrgOrder::<T>::decode_len().unwrap_or_default() as u32
		}

		/// Position of `org_id` in the enumeration order.
		pub fn org_position(org_id: &OrgId) -> Option<u32> {
			OrgOrder::<T>::get().iter().position(|id| id == org_id).map(|index| index as u32)
		}

		pub fn org_at(index: u32) -> Option<OrgDetails> {
			OrgOrder::<T>::get().get(index as usize).and_then(Orgs::<T>::get)
		}
	}

	impl<T: Config> OrgRegistry<T> for Pallet<T> {
		fn add_alliance_admin_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(AllianceAdminOrg::<T>::get().is_none(), Error::<T>::AllianceAdminOrgAlreadySet);

			Self::insert_org(org_id.clone(), OrgStatus::Approved)?;
			AllianceAdminOrg::<T>::put(&org_id);

			log::info!(target: LOG_TARGET, "alliance admin org set to {:?}", org_id);
			Self::deposit_event(Event::OrgApproved { org_id, status: OrgStatus::Approved });
			Ok(())
		}

		fn add_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::insert_org(org_id.clone(), OrgStatus::Proposed)?;

			log::debug!(target: LOG_TARGET, "org {:?} proposed", org_id);
			Self::deposit_event(Event::OrgPendingApproval { org_id, status: OrgStatus::Proposed });
			Ok(())
		}

		fn approve_org(invoker: &T::AccountId, org_id: &OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::transition(org_id, OrgStatus::Proposed, OrgStatus::Approved)?;

			Self::deposit_event(Event::OrgApproved { org_id: org_id.clone(), status: OrgStatus::Approved });
			Ok(())
		}

		fn update_org_status(invoker: &T::AccountId, org_id: &OrgId, action: StatusAction) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::ensure_not_alliance_admin_org(org_id)?;

			let status = match action {
				StatusAction::Suspend => {
					Self::transition(org_id, OrgStatus::Approved, OrgStatus::PendingSuspension)?;
					OrgStatus::PendingSuspension
				},
				StatusAction::RevokeSuspend => {
					Self::transition(org_id, OrgStatus::Suspended, OrgStatus::PendingSuspensionRevoke)?;
					OrgStatus::PendingSuspensionRevoke
				},
			};

			Self::deposit_event(Event::OrgPendingApproval { org_id: org_id.clone(), status });
			Ok(())
		}

		fn approve_org_status(invoker: &T::AccountId, org_id: &OrgId, action: StatusAction) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			Self::ensure_not_alliance_admin_org(org_id)?;

			match action {
				StatusAction::Suspend => {
					Self::transition(org_id, OrgStatus::PendingSuspension, OrgStatus::Suspended)?;
					Self::deposit_event(Event::OrgSuspended {
						org_id: org_id.clone(),
						status: OrgStatus::Suspended,
					});
				},
				StatusAction::RevokeSuspend => {
					Self::transition(org_id, OrgStatus::PendingSuspensionRevoke, OrgStatus::Approved)?;
					Self::deposit_event(Event::OrgSuspensionRevoked {
						org_id: org_id.clone(),
						status: OrgStatus::Approved,
					});
				},
			}
			Ok(())
		}

		fn org_status(org_id: &OrgId) -> Option<OrgStatus> {
			Orgs::<T>::get(org_id).map(|org| org.status)
		}
	}
}
