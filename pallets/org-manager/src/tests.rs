use crate::{mock::*, Error, Event, OrgOrder};
use frame_support::{assert_noop, assert_ok};
use permissioning_primitives::{OrgRegistry, OrgStatus, StatusAction};

fn admin_org() -> Vec<u8> {
	b"ADMIN".to_vec()
}

fn setup_alliance() {
	assert_ok!(OrgManager::add_alliance_admin_org(&implementation(), admin_org()));
}

#[test]
fn alliance_admin_org_is_approved_and_unique() {
	new_test_ext().execute_with(|| {
		setup_alliance();

		assert_eq!(OrgManager::alliance_admin_org(), Some(admin_org()));
		assert!(OrgManager::check_org_status(&admin_org(), OrgStatus::Approved));
		System::assert_last_event(Event::OrgApproved { org_id: admin_org(), status: OrgStatus::Approved }.into());

		assert_noop!(
			OrgManager::add_alliance_admin_org(&implementation(), b"OTHER".to_vec()),
			Error::<Test>::AllianceAdminOrgAlreadySet
		);
	});
}

#[test]
fn add_org_keeps_insertion_order() {
	new_test_ext().execute_with(|| {
		setup_alliance();
		assert_ok!(OrgManager::add_org(&implementation(), b"orgA".to_vec()));
		assert_ok!(OrgManager::add_org(&implementation(), b"orgB".to_vec()));

		System::assert_last_event(
			Event::OrgPendingApproval { org_id: b"orgB".to_vec(), status: OrgStatus::Proposed }.into(),
		);
		assert_eq!(OrgManager::org_count(), 3);
		assert_eq!(OrgManager::org_position(&b"orgB".to_vec()), Some(2));
		assert_eq!(OrgManager::org_at(1).map(|org| org.org_id), Some(b"orgA".to_vec()));

		let ids: Vec<_> = OrgManager::org_list().into_iter().map(|org| org.org_id).collect();
		assert_eq!(ids, OrgOrder::<Test>::get());
		assert_eq!(ids, vec![admin_org(), b"orgA".to_vec(), b"orgB".to_vec()]);
	});
}

#[test]
fn duplicate_org_is_rejected() {
	new_test_ext().execute_with(|| {
		assert_ok!(OrgManager::add_org(&implementation(), b"orgA".to_vec()));
		assert_noop!(
			OrgManager::add_org(&implementation(), b"orgA".to_vec()),
			Error::<Test>::OrgAlreadyExists
		);
	});
}

#[test]
fn only_the_implementation_can_mutate() {
	new_test_ext().execute_with(|| {
		assert_noop!(
			OrgManager::add_org(&account(1), b"orgA".to_vec()),
			Error::<Test>::NotPermissionImpl
		);
		assert_noop!(
			OrgManager::add_alliance_admin_org(&account(1), admin_org()),
			Error::<Test>::NotPermissionImpl
		);

		assert_ok!(OrgManager::add_org(&implementation(), b"orgA".to_vec()));
		assert_noop!(
			OrgManager::approve_org(&account(1), &b"orgA".to_vec()),
			Error::<Test>::NotPermissionImpl
		);
	});
}

#[test]
fn approve_requires_a_proposed_org() {
	new_test_ext().execute_with(|| {
		let org = b"orgA".to_vec();
		assert_noop!(OrgManager::approve_org(&implementation(), &org), Error::<Test>::OrgNotFound);

		assert_ok!(OrgManager::add_org(&implementation(), org.clone()));
		assert_ok!(OrgManager::approve_org(&implementation(), &org));
		System::assert_last_event(Event::OrgApproved { org_id: org.clone(), status: OrgStatus::Approved }.into());

		assert_noop!(OrgManager::approve_org(&implementation(), &org), Error::<Test>::UnexpectedOrgStatus);
	});
}

#[test]
fn suspension_round_trip() {
	new_test_ext().execute_with(|| {
		let org = b"orgA".to_vec();
		assert_ok!(OrgManager::add_org(&implementation(), org.clone()));
		assert_ok!(OrgManager::approve_org(&implementation(), &org));

		assert_ok!(OrgManager::update_org_status(&implementation(), &org, StatusAction::Suspend));
		assert_eq!(OrgManager::org_status(&org), Some(OrgStatus::PendingSuspension));
		System::assert_last_event(
			Event::OrgPendingApproval { org_id: org.clone(), status: OrgStatus::PendingSuspension }.into(),
		);

		assert_ok!(OrgManager::approve_org_status(&implementation(), &org, StatusAction::Suspend));
		assert_eq!(OrgManager::org_status(&org), Some(OrgStatus::Suspended));
		System::assert_last_event(Event::OrgSuspended { org_id: org.clone(), status: OrgStatus::Suspended }.into());

		assert_ok!(OrgManager::update_org_status(&implementation(), &org, StatusAction::RevokeSuspend));
		assert_eq!(OrgManager::org_status(&org), Some(OrgStatus::PendingSuspensionRevoke));

		assert_ok!(OrgManager::approve_org_status(&implementation(), &org, StatusAction::RevokeSuspend));
		assert_eq!(OrgManager::org_status(&org), Some(OrgStatus::Approved));
		System::assert_last_event(
			Event::OrgSuspensionRevoked { org_id: org, status: OrgStatus::Approved }.into(),
		);
	});
}

#[test]
fn status_requests_must_match_current_state() {
	new_test_ext().execute_with(|| {
		let org = b"orgA".to_vec();
		assert_ok!(OrgManager::add_org(&implementation(), org.clone()));

		// still proposed
		assert_noop!(
			OrgManager::update_org_status(&implementation(), &org, StatusAction::Suspend),
			Error::<Test>::UnexpectedOrgStatus
		);

		assert_ok!(OrgManager::approve_org(&implementation(), &org));
		assert_noop!(
			OrgManager::update_org_status(&implementation(), &org, StatusAction::RevokeSuspend),
			Error::<Test>::UnexpectedOrgStatus
		);
		assert_noop!(
			OrgManager::approve_org_status(&implementation(), &org, StatusAction::Suspend),
			Error::<Test>::UnexpectedOrgStatus
		);
		assert_noop!(
			OrgManager::update_org_status(&implementation(), &b"missing".to_vec(), StatusAction::Suspend),
			Error::<Test>::OrgNotFound
		);
	});
}

#[test]
fn alliance_admin_org_cannot_be_suspended() {
	new_test_ext().execute_with(|| {
		setup_alliance();

		assert_noop!(
			OrgManager::update_org_status(&implementation(), &admin_org(), StatusAction::Suspend),
			Error::<Test>::AllianceAdminOrgImmutable
		);
		assert_noop!(
			OrgManager::approve_org_status(&implementation(), &admin_org(), StatusAction::Suspend),
			Error::<Test>::AllianceAdminOrgImmutable
		);
	});
}
