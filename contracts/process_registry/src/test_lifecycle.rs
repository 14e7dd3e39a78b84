extern crate std;

use soroban_sdk::{testutils::Address as _, Address, BytesN, Env};

use crate::test::{contract_error, create, s, setup, NewProcess};
use crate::{envelope, mode, Error, ErrorClass, ProcessRegistryClient, ProcessStatus};

const ALL_STATUSES: [ProcessStatus; 4] = [
    ProcessStatus::Open,
    ProcessStatus::Ended,
    ProcessStatus::Canceled,
    ProcessStatus::Paused,
];

/// The complete list of allowed `(from, to)` edges.
const ALLOWED: [(ProcessStatus, ProcessStatus); 6] = [
    (ProcessStatus::Paused, ProcessStatus::Open),
    (ProcessStatus::Open, ProcessStatus::Paused),
    (ProcessStatus::Open, ProcessStatus::Ended),
    (ProcessStatus::Paused, ProcessStatus::Ended),
    (ProcessStatus::Open, ProcessStatus::Canceled),
    (ProcessStatus::Paused, ProcessStatus::Canceled),
];

/// Create an interruptible process and drive it into `status`.
fn process_in(
    env: &Env,
    client: &ProcessRegistryClient,
    entity: &Address,
    status: ProcessStatus,
) -> BytesN<32> {
    let id = create(env, client, entity, &NewProcess::default());
    if status != ProcessStatus::Open {
        client.set_status(entity, &id, &status);
    }
    assert_eq!(client.get_status(&id), status);
    id
}

#[test]
fn test_interruptible_state_machine_closure() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);

    for from in ALL_STATUSES {
        for to in ALL_STATUSES {
            let id = process_in(&env, &client, &entity, from);
            let result = client.try_set_status(&entity, &id, &to);

            if ALLOWED.contains(&(from, to)) {
                assert_eq!(result, Ok(Ok(())), "{:?} -> {:?} should succeed", from, to);
                assert_eq!(client.get_status(&id), to);
            } else {
                assert_eq!(
                    result,
                    Err(Ok(contract_error(Error::InvalidStatusTransition))),
                    "{:?} -> {:?} should be rejected",
                    from,
                    to
                );
                assert_eq!(client.get_status(&id), from);
            }
        }
    }
}

#[test]
fn test_non_interruptible_rejects_every_transition() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);

    let modes = [
        (0, ProcessStatus::Open),
        (mode::DYNAMIC_CENSUS | mode::ALLOW_VOTE_OVERWRITE, ProcessStatus::Open),
        (mode::AUTO_START, ProcessStatus::Paused),
    ];

    for (process_mode, initial) in modes {
        let id = create(
            &env,
            &client,
            &entity,
            &NewProcess {
                mode: process_mode,
                start_block: 10,
                ..NewProcess::default()
            },
        );
        assert_eq!(client.get_status(&id), initial);

        for to in ALL_STATUSES {
            let result = client.try_set_status(&entity, &id, &to);
            assert_eq!(result, Err(Ok(contract_error(Error::NotInterruptible))));
        }
        assert_eq!(client.get_status(&id), initial);
    }

    assert_eq!(
        Error::NotInterruptible.class(),
        ErrorClass::InvalidStateTransition
    );
    assert_eq!(
        Error::InvalidStatusTransition.class(),
        ErrorClass::InvalidStateTransition
    );
}

#[test]
fn test_auto_start_process_can_be_opened() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            mode: mode::AUTO_START | mode::INTERRUPTIBLE,
            start_block: 100,
            ..NewProcess::default()
        },
    );

    client.set_status(&entity, &id, &ProcessStatus::Open);
    assert_eq!(client.get_status(&id), ProcessStatus::Open);
}

#[test]
fn test_only_entity_can_set_status() {
    let (env, client, owner) = setup();
    let entity = Address::generate(&env);
    let stranger = Address::generate(&env);
    let id = create(&env, &client, &entity, &NewProcess::default());

    for caller in [&stranger, &owner] {
        let result = client.try_set_status(caller, &id, &ProcessStatus::Paused);
        assert_eq!(result, Err(Ok(contract_error(Error::NotEntity))));
    }
    assert_eq!(Error::NotEntity.class(), ErrorClass::Authorization);
    assert_eq!(client.get_status(&id), ProcessStatus::Open);
}

#[test]
fn test_set_status_unknown_process() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let unknown = BytesN::from_array(&env, &[9u8; 32]);

    let result = client.try_set_status(&entity, &unknown, &ProcessStatus::Paused);
    assert_eq!(result, Err(Ok(contract_error(Error::ProcessNotFound))));
}

// ── Question index ───────────────────────────────────────────────────

fn serial_process(env: &Env, client: &ProcessRegistryClient, entity: &Address, questions: u32) -> BytesN<32> {
    create(
        env,
        client,
        entity,
        &NewProcess {
            envelope_type: envelope::SERIAL,
            question_count: questions,
            ..NewProcess::default()
        },
    )
}

#[test]
fn test_question_overflow_ends_process() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = serial_process(&env, &client, &entity, 2);

    client.increment_question_index(&entity, &id);
    assert_eq!(client.get_question_index(&id), 1);
    assert_eq!(client.get_status(&id), ProcessStatus::Open);

    client.increment_question_index(&entity, &id);
    assert_eq!(client.get_question_index(&id), 1);
    assert_eq!(client.get_status(&id), ProcessStatus::Ended);

    let result = client.try_increment_question_index(&entity, &id);
    assert_eq!(result, Err(Ok(contract_error(Error::ProcessNotLive))));
}

#[test]
fn test_single_question_process_ends_on_first_increment() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = serial_process(&env, &client, &entity, 1);

    client.increment_question_index(&entity, &id);

    assert_eq!(client.get_question_index(&id), 0);
    assert_eq!(client.get_status(&id), ProcessStatus::Ended);
}

#[test]
fn test_question_index_advances_while_paused() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = serial_process(&env, &client, &entity, 3);
    client.set_status(&entity, &id, &ProcessStatus::Paused);

    client.increment_question_index(&entity, &id);

    assert_eq!(client.get_question_index(&id), 1);
    assert_eq!(client.get_status(&id), ProcessStatus::Paused);
}

#[test]
fn test_question_index_requires_serial_envelope() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            envelope_type: envelope::ANONYMOUS,
            question_count: 3,
            ..NewProcess::default()
        },
    );

    let result = client.try_increment_question_index(&entity, &id);
    assert_eq!(result, Err(Ok(contract_error(Error::NotSerial))));
    assert_eq!(client.get_question_index(&id), 0);
}

#[test]
fn test_question_index_rejected_after_cancel() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = serial_process(&env, &client, &entity, 3);
    client.set_status(&entity, &id, &ProcessStatus::Canceled);

    let result = client.try_increment_question_index(&entity, &id);
    assert_eq!(result, Err(Ok(contract_error(Error::ProcessNotLive))));
}

#[test]
fn test_question_overflow_needs_interruptible() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            mode: 0,
            envelope_type: envelope::SERIAL,
            question_count: 2,
            ..NewProcess::default()
        },
    );

    client.increment_question_index(&entity, &id);
    let result = client.try_increment_question_index(&entity, &id);

    assert_eq!(result, Err(Ok(contract_error(Error::NotInterruptible))));
    assert_eq!(client.get_question_index(&id), 1);
    assert_eq!(client.get_status(&id), ProcessStatus::Open);
}

#[test]
fn test_only_entity_can_increment_question() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let stranger = Address::generate(&env);
    let id = serial_process(&env, &client, &entity, 3);

    let result = client.try_increment_question_index(&stranger, &id);
    assert_eq!(result, Err(Ok(contract_error(Error::NotEntity))));
}

// ── Census ───────────────────────────────────────────────────────────

fn dynamic_census_process(env: &Env, client: &ProcessRegistryClient, entity: &Address) -> BytesN<32> {
    create(
        env,
        client,
        entity,
        &NewProcess {
            mode: mode::INTERRUPTIBLE | mode::DYNAMIC_CENSUS,
            ..NewProcess::default()
        },
    )
}

#[test]
fn test_set_census_updates_pair() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = dynamic_census_process(&env, &client, &entity);

    client.set_census(&entity, &id, &s(&env, "0xnewroot"), &s(&env, "ipfs://new-census"));

    let census = client.get_census(&id);
    assert_eq!(census.root, s(&env, "0xnewroot"));
    assert_eq!(census.uri, s(&env, "ipfs://new-census"));
}

#[test]
fn test_set_census_while_paused() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = dynamic_census_process(&env, &client, &entity);
    client.set_status(&entity, &id, &ProcessStatus::Paused);

    client.set_census(&entity, &id, &s(&env, "0xnewroot"), &s(&env, "ipfs://new-census"));
    assert_eq!(client.get(&id).census_root, s(&env, "0xnewroot"));
}

#[test]
fn test_set_census_rejects_partial_update() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = dynamic_census_process(&env, &client, &entity);

    let no_root = client.try_set_census(&entity, &id, &s(&env, ""), &s(&env, "ipfs://x"));
    let no_uri = client.try_set_census(&entity, &id, &s(&env, "0xroot"), &s(&env, ""));

    assert_eq!(no_root, Err(Ok(contract_error(Error::EmptyCensus))));
    assert_eq!(no_uri, Err(Ok(contract_error(Error::EmptyCensus))));
    let census = client.get_census(&id);
    assert_eq!(census.root, s(&env, "0xcensusroot"));
    assert_eq!(census.uri, s(&env, "ipfs://census"));
}

#[test]
fn test_set_census_requires_dynamic_census() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(&env, &client, &entity, &NewProcess::default());

    let result = client.try_set_census(&entity, &id, &s(&env, "0xroot"), &s(&env, "ipfs://x"));
    assert_eq!(result, Err(Ok(contract_error(Error::NotDynamicCensus))));
}

#[test]
fn test_set_census_rejected_after_end() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = dynamic_census_process(&env, &client, &entity);
    client.set_status(&entity, &id, &ProcessStatus::Ended);

    let result = client.try_set_census(&entity, &id, &s(&env, "0xroot"), &s(&env, "ipfs://x"));
    assert_eq!(result, Err(Ok(contract_error(Error::ProcessNotLive))));
}

#[test]
fn test_only_entity_can_set_census() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let stranger = Address::generate(&env);
    let id = dynamic_census_process(&env, &client, &entity);

    let result = client.try_set_census(&stranger, &id, &s(&env, "0xroot"), &s(&env, "ipfs://x"));
    assert_eq!(result, Err(Ok(contract_error(Error::NotEntity))));
}
