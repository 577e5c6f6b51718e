use codec::{Decode, Encode};
use permissioning_primitives::OperationKey;
use scale_info::TypeInfo;
use sp_runtime::RuntimeDebug;
use sp_std::vec::Vec;

#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct VoterDetails<AccountId> {
	pub account: AccountId,
	/// Deleted voters stay registered but inactive.
	pub active: bool,
}

/// An operation waiting for (or having reached) a majority of the voters.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct VotingOperation<AccountId> {
	pub key: OperationKey<AccountId>,
	pub voted_accounts: Vec<AccountId>,
	pub voted_count: u32,
	pub passed: bool,
}

impl<AccountId: PartialEq> VotingOperation<AccountId> {
	pub fn new(key: OperationKey<AccountId>) -> Self {
		Self { key, voted_accounts: Vec::new(), voted_count: 0, passed: false }
	}

	pub fn has_voted(&self, voter: &AccountId) -> bool {
		self.voted_accounts.contains(voter)
	}

	/// Strict majority over the voters active right now.
	pub fn reached_majority(&self, valid_voters: u32) -> bool {
		self.voted_count > valid_voters / 2
	}
}
