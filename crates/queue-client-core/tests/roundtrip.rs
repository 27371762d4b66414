mod common;

use common::{create_or_get_queue_url, local_client};
use proptest::prelude::*;
use queue_client::{AttributeValue, OutgoingMessage, ReceiveOptions};
use std::collections::BTreeMap;

fn attribute_value() -> impl Strategy<Value = AttributeValue> {
    prop_oneof![
        "[a-zA-Z0-9 ]{1,100}".prop_map(AttributeValue::String),
        any::<i64>().prop_map(AttributeValue::number),
        prop::collection::vec(any::<u8>(), 1..64).prop_map(AttributeValue::Binary),
    ]
}

// Property-based test: a sent message comes back with the same body and attributes
proptest! {
    #![proptest_config(ProptestConfig::with_cases(10))]

    #[test]
    fn prop_send_receive_preserves_message(
        body in "\\PC{1,500}",
        attributes in prop::collection::btree_map(
            "[A-Za-z][A-Za-z0-9_]{0,20}",
            attribute_value(),
            0..5usize,
        )
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let client = local_client().await;
            let queue = create_or_get_queue_url(&client, "test-prop-roundtrip").await;

            let message = OutgoingMessage {
                body: body.clone(),
                attributes: attributes.clone(),
                delay_seconds: None,
            };

            let ack = client.send_message(&queue, &message).await;
            prop_assert!(ack.is_ok(), "send_message should succeed for valid input: {:?}", ack);

            let received = client
                .receive_messages(&queue, ReceiveOptions::new(30).with_max_messages(10))
                .await
                .unwrap();

            prop_assert_eq!(received.len(), 1, "Should receive exactly the one message sent");
            prop_assert_eq!(&received[0].body, &body, "Body should be preserved exactly");
            prop_assert_eq!(&received[0].attributes, &attributes, "Attributes should be preserved");

            // leave the queue empty for the next case
            client
                .delete_message(&queue, &received[0].receipt_handle)
                .await
                .unwrap();

            Ok(())
        })?;
    }
}

#[tokio::test]
async fn bestseller_scenario() {
    let client = local_client().await;
    let queue = create_or_get_queue_url(&client, "test-bestseller").await;

    let message = OutgoingMessage::new(
        "Information about current NY Times fiction bestseller for week of 12/11/2016.",
    )
    .with_attribute("Title", AttributeValue::string("The Whistler"))
    .with_attribute("Author", AttributeValue::string("John Grisham"))
    .with_attribute("WeeksOn", AttributeValue::number(6))
    .with_delay_seconds(10);

    client.send_message(&queue, &message).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(11)).await;

    let received = client
        .receive_messages(&queue, ReceiveOptions::new(3))
        .await
        .unwrap();

    assert_eq!(received.len(), 1);
    let received = &received[0];
    assert_eq!(received.body, message.body);
    assert_eq!(
        received.attributes,
        BTreeMap::from([
            ("Author".to_string(), AttributeValue::string("John Grisham")),
            ("Title".to_string(), AttributeValue::string("The Whistler")),
            ("WeeksOn".to_string(), AttributeValue::Number("6".to_string())),
        ])
    );
    assert!(!received.message_id.is_empty());
    assert!(!received.receipt_handle.as_str().is_empty());
    assert!(received.system_attributes.contains_key("SentTimestamp"));
}
