extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    vec, Address, BytesN, IntoVal, TryIntoVal,
};

use crate::events::{
    CensusUpdated, OwnershipTransferred, ProcessCreated, QuestionIndexUpdated, ResultsPublished,
    StatusUpdated,
};
use crate::test::{create, s, setup, NewProcess};
use crate::{envelope, mode, ProcessStatus};

#[test]
fn test_process_created_event() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);

    let id = create(&env, &client, &entity, &NewProcess::default());

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), process_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProcessCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProcessCreated {
            entity: entity.clone(),
            process_id: id.clone(),
            census_uri: s(&env, "ipfs://census"),
        }
    );
}

#[test]
fn test_status_updated_event() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(&env, &client, &entity, &NewProcess::default());

    client.set_status(&entity, &id, &ProcessStatus::Paused);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("status").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: StatusUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        StatusUpdated {
            entity: entity.clone(),
            process_id: id.clone(),
            status: ProcessStatus::Paused,
        }
    );
}

#[test]
fn test_question_index_event() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            envelope_type: envelope::SERIAL,
            question_count: 3,
            ..NewProcess::default()
        },
    );

    client.increment_question_index(&entity, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("question").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: QuestionIndexUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.question_index, 1);
    assert_eq!(event_data.entity, entity);
}

#[test]
fn test_last_question_emits_status_event() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            envelope_type: envelope::SERIAL,
            question_count: 1,
            ..NewProcess::default()
        },
    );

    client.increment_question_index(&entity, &id);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let event_data: StatusUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data.status, ProcessStatus::Ended);
}

#[test]
fn test_census_updated_event() {
    let (env, client, _) = setup();
    let entity = Address::generate(&env);
    let id = create(
        &env,
        &client,
        &entity,
        &NewProcess {
            mode: mode::INTERRUPTIBLE | mode::DYNAMIC_CENSUS,
            ..NewProcess::default()
        },
    );

    client.set_census(&entity, &id, &s(&env, "0xroot2"), &s(&env, "ipfs://census2"));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let event_data: CensusUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        CensusUpdated {
            entity,
            process_id: id,
            census_root: s(&env, "0xroot2"),
            census_uri: s(&env, "ipfs://census2"),
        }
    );
}

#[test]
fn test_results_published_event() {
    let (env, client, owner) = setup();
    let entity = Address::generate(&env);
    let oracle = Address::generate(&env);
    client.add_oracle(&owner, &oracle);
    let id = create(&env, &client, &entity, &NewProcess::default());

    client.set_results(&oracle, &id, &s(&env, "ipfs://results"));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("results").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ResultsPublished = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ResultsPublished {
            process_id: id,
            results: s(&env, "ipfs://results"),
        }
    );
}

#[test]
fn test_registry_config_events() {
    let (env, client, owner) = setup();
    let oracle = Address::generate(&env);
    let new_owner = Address::generate(&env);

    client.set_chain_id(&owner, &7);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("chain_id").into_val(&env)]
    );
    let chain_id: u32 = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(chain_id, 7);

    let genesis = BytesN::from_array(&env, &[0x42u8; 32]);
    client.set_genesis(&owner, &genesis);
    let last_event = env.events().all().last().expect("No events found");
    let data: BytesN<32> = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(data, genesis);

    client.add_oracle(&owner, &oracle);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("orc_add").into_val(&env)]
    );
    let data: Address = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(data, oracle);

    client.remove_oracle(&owner, &0, &oracle);
    let last_event = env.events().all().last().expect("No events found");
    assert_eq!(
        last_event.1,
        vec![&env, symbol_short!("orc_rm").into_val(&env)]
    );

    client.transfer_ownership(&owner, &new_owner);
    let last_event = env.events().all().last().expect("No events found");
    let data: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        data,
        OwnershipTransferred {
            previous_owner: owner,
            new_owner,
        }
    );
}
