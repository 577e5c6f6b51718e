use codec::{Decode, Encode};
use permissioning_primitives::{AccessLevel, AccountStatus, OrgId};
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct AccountDetails<AccountId> {
	pub account: AccountId,
	pub org_id: OrgId,
	pub access: AccessLevel,
	pub is_org_admin: bool,
	pub status: AccountStatus,
	/// Derived from `access`, never set on its own.
	pub is_voter: bool,
}

impl<AccountId> AccountDetails<AccountId> {
	pub fn new(
		account: AccountId,
		org_id: OrgId,
		access: AccessLevel,
		is_org_admin: bool,
		status: AccountStatus,
	) -> Self {
		Self { account, org_id, access, is_org_admin, status, is_voter: access.grants_vote() }
	}

	pub fn set_access(&mut self, access: AccessLevel) {
		self.access = access;
		self.is_voter = access.grants_vote();
	}
}
