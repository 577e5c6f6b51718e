#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(test)]
mod mock;


pub mod types;

pub use pallet::*;

const LOG_TARGET: &str = "runtime::account-manager";

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::types::AccountDetails;
	use frame_support::pallet_prelude::*;
	use permissioning_primitives::{
		AccessLevel, AccountRegistry, AccountStatus, ImplementationResolver, OrgId, StatusAction,
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
	#[pallet::getter(fn alliance_admin_org)]
	pub type AllianceAdminOrg<T: Config> = StorageValue<_, OrgId, OptionQuery>;

	#[pallet::storage]
	#[pallet::getter(fn account)]
	pub type Accounts<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, AccountDetails<T::AccountId>, OptionQuery>;

	/// Accounts in insertion order.
	#[pallet::storage]
	pub type AccountOrder<T: Config> = StorageValue<_, Vec<T::AccountId>, ValueQuery>;

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		AccountAdded { account: T::AccountId, org_id: OrgId, access: AccessLevel, is_org_admin: bool },
		AccountStatusChanged { org_id: OrgId, account: T::AccountId, status: AccountStatus },
		AccountAccessChanged { org_id: OrgId, account: T::AccountId, access: AccessLevel },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Invoker is not the current permissions implementation.
		NotPermissionImpl,
		AccountAlreadyExists,
		AccountNotFound,
		/// Full access is reserved for alliance admins.
		InvalidAccess,
		/// Ordinary accounts cannot join the alliance admin organization.
		AllianceAdminOrgForbidden,
		/// The target organization is not the alliance admin organization.
		NotAllianceAdminOrg,
		/// The account belongs to another organization.
		AccountOrgMismatch,
		/// Organization admins are not affected by ordinary status or access changes.
		OrgAdminImmutable,
		/// The account is not in the state the request applies to.
		UnexpectedAccountStatus,
	}

	impl<T: Config> Pallet<T> {
		fn ensure_permission_impl(invoker: &T::AccountId) -> DispatchResult {
			ensure!(
				T::Upgradable::permission_impl().as_ref() == Some(invoker),
				Error::<T>::NotPermissionImpl
			);
			Ok(())
		}

		fn is_alliance_admin_org(org_id: &OrgId) -> bool {
			AllianceAdminOrg::<T>::get().as_ref() == Some(org_id)
		}

		fn insert_account(details: AccountDetails<T::AccountId>) -> DispatchResult {
			ensure!(!Accounts::<T>::contains_key(&details.account), Error::<T>::AccountAlreadyExists);

			AccountOrder::<T>::mutate(|order| order.push(details.account.clone()));
			Accounts::<T>::insert(&details.account, &details);

			log::debug!(target: LOG_TARGET, "account {:?} added to org {:?}", details.account, details.org_id);
			Self::deposit_event(Event::AccountAdded {
				account: details.account,
				org_id: details.org_id,
				access: details.access,
				is_org_admin: details.is_org_admin,
			});
			Ok(())
		}

		/// Loads an account that belongs to `org_id` and is not one of its admins.
		fn ordinary_member_of(
			account: &T::AccountId,
			org_id: &OrgId,
		) -> Result<AccountDetails<T::AccountId>, DispatchError> {
			let details = Accounts::<T>::get(account).ok_or(Error::<T>::AccountNotFound)?;
			ensure!(&details.org_id == org_id, Error::<T>::AccountOrgMismatch);
			ensure!(!details.is_org_admin, Error::<T>::OrgAdminImmutable);
			Ok(details)
		}

		pub fn account_access(account: &T::AccountId) -> Option<AccessLevel> {
			Accounts::<T>::get(account).map(|details| details.access)
		}

		pub fn account_status(account: &T::AccountId) -> AccountStatus {
			Accounts::<T>::get(account).map_or(AccountStatus::NotInList, |details| details.status)
		}

		/// All accounts in the order they were added.
		pub fn account_list() -> Vec<AccountDetails<T::AccountId>> {
			AccountOrder::<T>::get().iter().filter_map(Accounts::<T>::get).collect()
		}

		pub fn account_count() -> u32 {
			AccountOrder::<T>::decode_len().unwrap_or_default() as u32
		}

		pub fn account_position(account: &T::AccountId) -> Option<u32> {
			AccountOrder::<T>::get().iter().position(|a| a == account).map(|index| index as u32)
		}
	}

	impl<T: Config> AccountRegistry<T> for Pallet<T> {
		fn set_alliance_admin_org(invoker: &T::AccountId, org_id: OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			AllianceAdminOrg::<T>::put(org_id);
			Ok(())
		}

		fn add_account(
			invoker: &T::AccountId,
			account: T::AccountId,
			org_id: OrgId,
			access: AccessLevel,
			is_org_admin: bool,
			status: AccountStatus,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(access.is_assignable(), Error::<T>::InvalidAccess);
			ensure!(!Self::is_alliance_admin_org(&org_id), Error::<T>::AllianceAdminOrgForbidden);

			Self::insert_account(AccountDetails::new(account, org_id, access, is_org_admin, status))
		}

		fn assign_alliance_admin(
			invoker: &T::AccountId,
			account: T::AccountId,
			org_id: OrgId,
			access: AccessLevel,
			status: AccountStatus,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(Self::is_alliance_admin_org(&org_id), Error::<T>::NotAllianceAdminOrg);

			Self::insert_account(AccountDetails::new(account, org_id, access, true, status))
		}

		fn approve_admin(invoker: &T::AccountId, account: &T::AccountId, org_id: &OrgId) -> Result<bool, DispatchError> {
			Self::ensure_permission_impl(invoker)?;

			Accounts::<T>::try_mutate(account, |maybe_details| -> DispatchResult {
				let details = maybe_details.as_mut().ok_or(Error::<T>::AccountNotFound)?;
				ensure!(&details.org_id == org_id, Error::<T>::AccountOrgMismatch);
				details.status = AccountStatus::Active;
				Ok(())
			})?;

			Self::deposit_event(Event::AccountStatusChanged {
				org_id: org_id.clone(),
				account: account.clone(),
				status: AccountStatus::Active,
			});
			Ok(Self::is_alliance_admin_org(org_id))
		}

		fn update_account_status(
			invoker: &T::AccountId,
			account: &T::AccountId,
			org_id: &OrgId,
			action: StatusAction,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			let mut details = Self::ordinary_member_of(account, org_id)?;

			let (from, to) = match action {
				StatusAction::Suspend => (AccountStatus::Active, AccountStatus::Suspended),
				StatusAction::RevokeSuspend => (AccountStatus::Suspended, AccountStatus::Active),
			};
			ensure!(details.status == from, Error::<T>::UnexpectedAccountStatus);
			details.status = to;
			Accounts::<T>::insert(account, details);

			log::debug!(target: LOG_TARGET, "account {:?}: {:?} -> {:?}", account, from, to);
			Self::deposit_event(Event::AccountStatusChanged { org_id: org_id.clone(), account: account.clone(), status: to });
			Ok(())
		}

		fn update_account_access(
			invoker: &T::AccountId,
			account: &T::AccountId,
			org_id: &OrgId,
			access: AccessLevel,
		) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(access.is_assignable(), Error::<T>::InvalidAccess);
			let mut details = Self::ordinary_member_of(account, org_id)?;

			details.set_access(access);
			Accounts::<T>::insert(account, details);

			Self::deposit_event(Event::AccountAccessChanged { org_id: org_id.clone(), account: account.clone(), access });
			Ok(())
		}

		fn revoke_alliance_admin(invoker: &T::AccountId, account: &T::AccountId, org_id: &OrgId) -> DispatchResult {
			Self::ensure_permission_impl(invoker)?;
			ensure!(Self::is_alliance_admin_org(org_id), Error::<T>::NotAllianceAdminOrg);

			let mut details = Accounts::<T>::get(account).ok_or(Error::<T>::AccountNotFound)?;
			ensure!(&details.org_id == org_id, Error::<T>::AccountOrgMismatch);
			ensure!(details.status == AccountStatus::Active, Error::<T>::UnexpectedAccountStatus);

			details.status = AccountStatus::Suspended;
			details.set_access(AccessLevel::ReadOnly);
			Accounts::<T>::insert(account, details);

			log::info!(target: LOG_TARGET, "alliance admin {:?} revoked", account);
			Self::deposit_event(Event::AccountStatusChanged {
				org_id: org_id.clone(),
				account: account.clone(),
				status: AccountStatus::Suspended,
			});
			Self::deposit_event(Event::AccountAccessChanged {
				org_id: org_id.clone(),
				account: account.clone(),
				access: AccessLevel::ReadOnly,
			});
			Ok(())
		}

		fn account_exists(account: &T::AccountId) -> bool {
			Accounts::<T>::contains_key(account)
		}

		fn is_org_admin(account: &T::AccountId, org_id: &OrgId) -> bool {
			Accounts::<T>::get(account).map_or(false, |details| {
				details.is_org_admin && details.status == AccountStatus::Active && &details.org_id == org_id
			})
		}

		fn is_alliance_admin_account(account: &T::AccountId) -> bool {
			Accounts::<T>::get(account).map_or(false, |details| {
				details.status == AccountStatus::Active && Self::is_alliance_admin_org(&details.org_id)
			})
		}
	}
}
