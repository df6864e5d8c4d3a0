use chrono::{Duration, TimeZone, Utc};

use super::mm_type;
use super::plant;
use super::point::{self, NewPoint};
use super::*;

async fn prepare_node(conn: &SqlitePool, node_id: i32) -> (plant::PlantDao, mm_type::MMTypeDao) {
    let plant = plant::insert(conn, node_id, 1, "Basil").await.unwrap();
    let mm_type = mm_type::insert(conn, node_id, 1, "moisture").await.unwrap();
    (plant, mm_type)
}

fn new_point(node_id: i32, entity_id: i32, plant: i32, mm_type: i32, hour: u32) -> NewPoint {
    NewPoint {
        node_id,
        node_entity_id: entity_id,
        plant_id: plant,
        type_id: mm_type,
        value: entity_id as f64 / 10.0,
        time: Utc.with_ymd_and_hms(2021, 5, 3, hour, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_db_connection() {
    let conn = establish_memory_connection().await;
    check_schema(&conn).await.unwrap();
}

#[tokio::test]
async fn crud_plants() {
    let conn = establish_memory_connection().await;

    // create
    let plant = plant::insert(&conn, 1, 5, "Basil").await.unwrap();
    assert_eq!(1, plant.node_id());
    assert_eq!(5, plant.node_entity_id());

    // read
    let found = plant::find_by_identity(&conn, 1, 5).await.unwrap().unwrap();
    assert_eq!(plant.id(), found.id());
    assert_eq!("Basil", found.name());
    assert!(plant::find_by_identity(&conn, 2, 5).await.unwrap().is_none());
    assert!(plant::get(&conn, plant.id()).await.unwrap().is_some());
    assert_eq!(1, plant::read_for_node(&conn, 1).await.unwrap().len());

    // identity is unique
    assert!(plant::insert(&conn, 1, 5, "Mint").await.is_err());
}

#[tokio::test]
async fn crud_types() {
    let conn = establish_memory_connection().await;

    let mm_type = mm_type::insert(&conn, 3, 2, "temperature").await.unwrap();
    let found = mm_type::find_by_identity(&conn, 3, 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mm_type.id(), found.id());
    assert_eq!("temperature", found.name());
    assert!(mm_type::find_by_identity(&conn, 3, 1).await.unwrap().is_none());
}

#[tokio::test]
async fn crud_points() {
    let conn = establish_memory_connection().await;
    let (plant, mm_type) = prepare_node(&conn, 1).await;

    // create
    let dao = point::insert(&conn, &new_point(1, 10, plant.id(), mm_type.id(), 8))
        .await
        .unwrap();
    assert_eq!(1.0, dao.value());
    assert_eq!(Utc.with_ymd_and_hms(2021, 5, 3, 8, 0, 0).unwrap(), dao.time());

    // read
    let found = point::find_by_identity(&conn, 1, 10).await.unwrap().unwrap();
    assert_eq!(dao.id(), found.id());
    assert!(point::find_by_identity(&conn, 1, 11).await.unwrap().is_none());
    assert_eq!(1, point::count_for_node(&conn, 1).await.unwrap());

    // identity is unique
    assert!(
        point::insert(&conn, &new_point(1, 10, plant.id(), mm_type.id(), 9))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn latest_points() {
    let conn = establish_memory_connection().await;
    let (plant_a, type_a) = prepare_node(&conn, 1).await;
    let (plant_b, type_b) = prepare_node(&conn, 2).await;

    assert!(point::latest(&conn).await.unwrap().is_none());
    assert!(point::latest_for_node(&conn, 1).await.unwrap().is_none());

    for (entity_id, hour) in [(1, 6), (2, 9), (3, 7)] {
        point::insert(&conn, &new_point(1, entity_id, plant_a.id(), type_a.id(), hour))
            .await
            .unwrap();
    }
    point::insert(&conn, &new_point(2, 1, plant_b.id(), type_b.id(), 12))
        .await
        .unwrap();

    let node_latest = point::latest_for_node(&conn, 1).await.unwrap().unwrap();
    assert_eq!(2, node_latest.node_entity_id());

    let global_latest = point::latest(&conn).await.unwrap().unwrap();
    assert_eq!(2, global_latest.node_id());
    assert_eq!(
        global_latest.time() - Duration::hours(3),
        node_latest.time()
    );
}

#[tokio::test]
async fn points_for_plant_are_ordered() {
    let conn = establish_memory_connection().await;
    let (plant, mm_type) = prepare_node(&conn, 1).await;

    for (entity_id, hour) in [(1, 10), (2, 3), (3, 20)] {
        point::insert(&conn, &new_point(1, entity_id, plant.id(), mm_type.id(), hour))
            .await
            .unwrap();
    }

    let points = point::get_for_plant(&conn, plant.id()).await.unwrap();
    let ids: Vec<i32> = points.iter().map(|p| p.node_entity_id()).collect();
    assert_eq!(vec![2, 1, 3], ids);
    assert!(point::get_for_plant(&conn, plant.id() + 1)
        .await
        .unwrap()
        .is_empty());
}
