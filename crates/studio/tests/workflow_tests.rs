use generation::{AspectRatio, MockGateway, MockScript};
use history::{HistoryLog, MemoryStore, SequentialIdGenerator};
use image::ImageFormat;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use studio::{Step, StudioController};

const WAIT: Duration = Duration::from_secs(5);

fn product_photo() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 120, 40, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn studio_with(gateway: Arc<MockGateway>, store: MemoryStore) -> StudioController {
    let log = HistoryLog::new(
        Box::new(store),
        Box::new(SequentialIdGenerator::default()),
    );
    StudioController::new(gateway, log)
}

#[test]
fn full_journey_from_upload_to_video_prompt() {
    let gateway = Arc::new(MockGateway::with_script(MockScript {
        prepared_image: Some(b"cleaned-png".to_vec()),
        ad_image: Some(b"ad-jpeg".to_vec()),
        video_prompt: Some("A slow dolly zoom...".to_string()),
        ..MockScript::default()
    }));
    let store = MemoryStore::new();
    let mut studio = studio_with(Arc::clone(&gateway), store.clone());

    studio.upload(product_photo()).unwrap();
    studio.begin_prepare().unwrap();
    assert!(studio.wait_idle(WAIT));
    assert_eq!(studio.state().prepared.as_ref().unwrap().bytes(), b"cleaned-png");

    studio.advance_to_design().unwrap();
    studio.set_scene("a marble podium in a galaxy").unwrap();
    studio.begin_design(AspectRatio::Square).unwrap();
    assert!(studio.wait_idle(WAIT));

    let state = studio.state();
    assert_eq!(state.step, Step::Finalize);
    let final_ad = state.final_ad.as_ref().unwrap();
    assert_eq!(final_ad.artifact.bytes(), b"ad-jpeg");
    assert_eq!(studio.history().len(), 1);
    assert_eq!(
        studio.history()[0].scene_description,
        "a marble podium in a galaxy"
    );

    studio.begin_video_prompt().unwrap();
    assert!(studio.wait_idle(WAIT));
    assert_eq!(
        studio.state().video_prompt.as_deref(),
        Some("A slow dolly zoom...")
    );
    assert_eq!(studio.history()[0].video_prompt, "A slow dolly zoom...");

    // The durable log carries the amendment too.
    let persisted: Vec<history::HistoryEntry> =
        serde_json::from_str(&store.blob().unwrap()).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].video_prompt, "A slow dolly zoom...");
}

#[test]
fn each_design_appends_one_entry_newest_first() {
    let gateway = Arc::new(MockGateway::new());
    let mut studio = studio_with(gateway, MemoryStore::new());
    studio.upload(product_photo()).unwrap();
    studio.advance_to_design().unwrap();

    for (index, scene) in ["first scene", "second scene"].iter().enumerate() {
        studio.set_scene(*scene).unwrap();
        studio.begin_design(AspectRatio::Landscape).unwrap();
        assert!(studio.wait_idle(WAIT));
        assert_eq!(studio.history().len(), index + 1);
        assert_eq!(studio.history()[0].scene_description, *scene);
        studio.redesign_from_prepared().unwrap();
    }

    let ids: std::collections::HashSet<_> =
        studio.history().iter().map(|entry| entry.id.clone()).collect();
    assert_eq!(ids.len(), 2);
}

#[test]
fn stale_response_after_start_over_is_discarded() {
    let (release, gate) = crossbeam_channel::unbounded();
    let gateway = Arc::new(
        MockGateway::with_script(MockScript {
            prepared_image: Some(b"late-arrival".to_vec()),
            ..MockScript::default()
        })
        .gated(gate),
    );
    let mut studio = studio_with(gateway, MemoryStore::new());

    studio.upload(product_photo()).unwrap();
    studio.begin_prepare().unwrap();
    assert!(studio.is_busy());

    // The user bails out while the call is still in flight.
    studio.start_over();
    assert!(!studio.is_busy());

    // A fresh session starts before the old call resolves.
    studio.upload(product_photo()).unwrap();
    let fresh_bytes = studio.state().original.as_ref().unwrap().bytes().to_vec();

    // Let the orphaned call finish and drain its outcome: the successful
    // result belongs to the previous session and must not land anywhere.
    release.send(()).unwrap();
    std::thread::sleep(Duration::from_millis(200));
    studio.pump();

    let state = studio.state();
    assert_eq!(state.step, Step::Prepare);
    assert!(!state.has_prepared);
    assert_eq!(state.prepared.as_ref().unwrap().bytes(), fresh_bytes);
    assert!(state.last_error.is_none());

    // The fresh session still prepares normally afterwards.
    studio.begin_prepare().unwrap();
    release.send(()).unwrap();
    assert!(studio.wait_idle(WAIT));
    assert!(studio.state().has_prepared);
    assert_eq!(
        studio.state().prepared.as_ref().unwrap().bytes(),
        b"late-arrival"
    );
}

#[test]
fn stale_failure_after_start_over_leaves_state_clean() {
    let (release, gate) = crossbeam_channel::unbounded();
    let gateway = Arc::new(MockGateway::new().gated(gate));
    gateway.queue_failure("too late to matter");
    let mut studio = studio_with(Arc::clone(&gateway), MemoryStore::new());

    studio.upload(product_photo()).unwrap();
    studio.begin_prepare().unwrap();
    studio.start_over();

    release.send(()).unwrap();
    // Give the worker time to deliver, then drain.
    std::thread::sleep(Duration::from_millis(200));
    studio.pump();

    let state = studio.state();
    assert!(state.last_error.is_none());
    assert!(state.original.is_none());
    assert_eq!(state.step, Step::Prepare);
}
