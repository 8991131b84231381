use cart_core::mock::{MockInventory, RecordingNotifier};
use cart_core::{
    decode_cart, CartChange, CartError, CartStore, InventoryError, MemoryStore, Product, ProductId,
    UpdateProductAmount,
};
use cart_service::actor::CartActor;
use cart_service::client::ClientError;

fn sneaker(id: u32) -> Product {
    Product::new(ProductId(id), format!("Sneaker {id}"), 199.9, format!("https://img/{id}.jpg"))
}

/// Real cart actor with mocked inventory and in-memory storage.
///
/// - Real `CartActor` + `CartStore` (the logic under test)
/// - `MockInventory` scripted per request
/// - `MemoryStore` inspected directly after each step
#[tokio::test]
async fn test_cart_actor_with_mocked_dependencies() {
    let inventory = MockInventory::new();
    let storage = MemoryStore::new();
    let notifier = RecordingNotifier::new();

    inventory.expect_stock(1).return_amount(3);
    inventory.expect_product(1).return_ok(sneaker(1));
    inventory.expect_stock(1).return_amount(3);
    inventory.expect_stock(1).return_amount(3);

    let store = CartStore::open(inventory.clone(), storage.clone(), notifier.clone(), "cart")
        .await
        .unwrap();
    let (actor, client) = CartActor::new(store, 8);
    let actor_handle = tokio::spawn(actor.run());

    assert_eq!(client.add_product(ProductId(1)).await.unwrap(), CartChange::Committed);
    assert_eq!(client.add_product(ProductId(1)).await.unwrap(), CartChange::Committed);

    let result = client
        .update_product_amount(UpdateProductAmount::new(ProductId(1), 4))
        .await;
    assert!(matches!(
        result,
        Err(ClientError::Cart(CartError::OutOfStock { requested: 4, .. }))
    ));

    let cart = client.snapshot().await.unwrap();
    assert_eq!(cart.find(ProductId(1)).unwrap().amount.get(), 2);
    assert_eq!(decode_cart(&storage.raw("cart").unwrap()).unwrap(), cart);
    assert_eq!(notifier.messages(), vec!["quantity requested is out of stock"]);
    inventory.verify();

    drop(client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_actor_keeps_serving_after_failures() {
    let inventory = MockInventory::new();
    let notifier = RecordingNotifier::new();

    inventory
        .expect_stock(2)
        .return_err(InventoryError::Transport("timed out".into()));
    inventory.expect_stock(2).return_amount(1);
    inventory.expect_product(2).return_ok(sneaker(2));

    let store = CartStore::open(inventory.clone(), MemoryStore::new(), notifier.clone(), "cart")
        .await
        .unwrap();
    let (actor, client) = CartActor::new(store, 1);
    let actor_handle = tokio::spawn(actor.run());

    assert!(matches!(
        client.add_product(ProductId(2)).await,
        Err(ClientError::Cart(CartError::Upstream { .. }))
    ));
    assert!(matches!(
        client.remove_product(ProductId(2)).await,
        Err(ClientError::Cart(CartError::NotFound(_)))
    ));
    client.add_product(ProductId(2)).await.unwrap();

    assert_eq!(client.snapshot().await.unwrap().len(), 1);
    assert_eq!(
        notifier.messages(),
        vec!["failed to add product", "failed to remove product"]
    );
    inventory.verify();

    drop(client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_queued_requests_are_applied_before_shutdown() {
    let inventory = MockInventory::new();
    let storage = MemoryStore::new();
    // Same product each time, so arrival order does not matter.
    inventory.expect_stock(1).return_amount(3);
    inventory.expect_product(1).return_ok(sneaker(1));
    inventory.expect_stock(1).return_amount(3);
    inventory.expect_stock(1).return_amount(3);

    let store = CartStore::open(
        inventory.clone(),
        storage.clone(),
        RecordingNotifier::new(),
        "cart",
    )
    .await
    .unwrap();
    let (actor, client) = CartActor::new(store, 4);

    let pending: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.add_product(ProductId(1)).await })
        })
        .collect();
    drop(client);

    let actor_handle = tokio::spawn(actor.run());
    for task in pending {
        task.await.unwrap().unwrap();
    }
    actor_handle.await.unwrap();

    let persisted = decode_cart(&storage.raw("cart").unwrap()).unwrap();
    assert_eq!(persisted.find(ProductId(1)).unwrap().amount.get(), 3);
    inventory.verify();
}
