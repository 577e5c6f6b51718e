//! Guardian-controlled indirection between the interface and the
//! implementation currently in charge.

use crate::{
	implementation::Implementation,
	interface::Interface,
	pallet::{Config, Error, Event, Guardian, InitDone, Pallet, PermImpl, PermInterface},
	LOG_TARGET,
};
use frame_support::{ensure, traits::Get};
use permissioning_primitives::ImplementationResolver;
use sp_runtime::{traits::AccountIdConversion, DispatchError, DispatchResult};
use sp_std::marker::PhantomData;

pub struct Upgradable<T>(PhantomData<T>);

impl<T: Config> Upgradable<T> {
	/// Account the proxy acts as when it calls into the interface or an
	/// implementation.
	pub fn account_id() -> T::AccountId {
		T::PalletId::get().into_account_truncating()
	}

	pub fn ensure_guardian(who: &T::AccountId) -> DispatchResult {
		ensure!(Guardian::<T>::get().as_ref() == Some(who), Error::<T>::NotGuardian);
		Ok(())
	}

	pub fn init(who: &T::AccountId, perm_interface: T::AccountId, perm_impl: T::AccountId) -> DispatchResult {
		Self::ensure_guardian(who)?;
		ensure!(!InitDone::<T>::get(), Error::<T>::AlreadyInitialized);

		PermInterface::<T>::put(&perm_interface);
		PermImpl::<T>::put(&perm_impl);
		Interface::<T>::set_permission_impl(&Self::account_id(), perm_impl.clone())?;
		InitDone::<T>::put(true);

		log::info!(target: LOG_TARGET, "interface {:?} bound to implementation {:?}", perm_interface, perm_impl);
		Pallet::<T>::deposit_event(Event::UpgradableInitialized { perm_interface, perm_impl });
		Ok(())
	}

	/// Switches the interface to `new_impl`, carrying the policy of the
	/// outgoing implementation over.
	pub fn change_impl(who: &T::AccountId, new_impl: T::AccountId) -> DispatchResult {
		Self::ensure_guardian(who)?;
		ensure!(InitDone::<T>::get(), Error::<T>::NotInitialized);

		let old_impl = Self::current()?;
		let policy = Implementation::<T>::at(old_impl.clone()).policy()?;

		PermImpl::<T>::put(&new_impl);
		let upgradable = Self::account_id();
		Interface::<T>::set_permission_impl(&upgradable, new_impl.clone())?.set_migration_policy(&upgradable, policy)?;

		log::info!(target: LOG_TARGET, "implementation changed from {:?} to {:?}", old_impl, new_impl);
		Pallet::<T>::deposit_event(Event::ImplementationChanged { old_impl, new_impl });
		Ok(())
	}

	pub fn current() -> Result<T::AccountId, DispatchError> {
		PermImpl::<T>::get().ok_or_else(|| Error::<T>::NotInitialized.into())
	}
}

impl<T: Config> ImplementationResolver<T> for Pallet<T> {
	fn permission_impl() -> Option<T::AccountId> {
		PermImpl::<T>::get()
	}
}
