use pano_core::constants::LOCAL_SNAPSHOT_KEY;
use pano_core::LocalSnapshot;
use web_sys as web;

fn local_storage() -> Option<web::Storage> {
    match web::window()?.local_storage() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("[storage] localStorage unavailable: {:?}", e);
            None
        }
    }
}

pub fn load_local() -> Option<LocalSnapshot> {
    let text = local_storage()?.get_item(LOCAL_SNAPSHOT_KEY).ok()??;
    Some(LocalSnapshot::from_json_or_default(&text))
}

pub fn save_local(snapshot: &LocalSnapshot) {
    let Some(storage) = local_storage() else {
        return;
    };
    match snapshot.to_json() {
        Ok(text) => {
            if let Err(e) = storage.set_item(LOCAL_SNAPSHOT_KEY, &text) {
                log::warn!("[storage] write failed: {:?}", e);
            }
        }
        Err(e) => log::warn!("[storage] {}", e),
    }
}
