//! Binding of the public interface to an implementation.

use crate::{
	implementation::Implementation,
	pallet::{Config, Error, InterfaceImpl, InterfaceUpgradable, PermInterface},
};
use frame_support::ensure;
use sp_runtime::DispatchError;
use sp_std::marker::PhantomData;

pub struct Interface<T>(PhantomData<T>);

impl<T: Config> Interface<T> {
	/// Points the interface at `perm_impl` and configures it. The first
	/// caller becomes the only account allowed to rebind the interface.
	pub fn set_permission_impl(from: &T::AccountId, perm_impl: T::AccountId) -> Result<Implementation<T>, DispatchError> {
		let upgradable = match InterfaceUpgradable::<T>::get() {
			Some(upgradable) => upgradable,
			None => {
				InterfaceUpgradable::<T>::put(from);
				from.clone()
			},
		};
		ensure!(&upgradable == from, Error::<T>::NotFromUpgradable);

		InterfaceImpl::<T>::put(&perm_impl);
		Implementation::<T>::configure(perm_impl, upgradable)
	}

	/// The interface's own identity and the implementation it forwards to.
	pub fn bound() -> Result<(T::AccountId, Implementation<T>), DispatchError> {
		let interface = PermInterface::<T>::get().ok_or(Error::<T>::InterfaceNotBound)?;
		let perm_impl = InterfaceImpl::<T>::get().ok_or(Error::<T>::InterfaceNotBound)?;
		Ok((interface, Implementation::at(perm_impl)))
	}
}
