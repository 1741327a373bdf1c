use std::thread;

use crossbeam_channel::{Receiver, Sender};

use facespot_core::detection::domain::detection_client::{ClientError, DetectionClient};
use facespot_core::detection::domain::face_geometry::DetectionResponse;
use facespot_core::detection::infrastructure::http_detection_client::HttpDetectionClient;
use facespot_core::viewer::overlay_controller::PendingDetection;

/// A finished request, handed back with the selection it was issued for.
pub struct DetectionReply {
    pub pending: PendingDetection,
    pub result: Result<DetectionResponse, ClientError>,
}

/// Starts the request thread. Requests are issued one at a time, in the
/// order they were queued, until the request sender is dropped.
pub fn spawn(requests: Receiver<PendingDetection>, tx: Sender<DetectionReply>) {
    thread::spawn(move || match HttpDetectionClient::new() {
        Ok(client) => run(&client, &requests, &tx),
        Err(e) => {
            log::error!("Cannot create detection client: {e}");
            for pending in requests.iter() {
                let result = Err(ClientError::Transport(e.to_string()));
                let _ = tx.send(DetectionReply { pending, result });
            }
        }
    });
}

fn run(
    client: &dyn DetectionClient,
    requests: &Receiver<PendingDetection>,
    tx: &Sender<DetectionReply>,
) {
    for pending in requests.iter() {
        let result = client.fetch(&pending.target);
        if tx.send(DetectionReply { pending, result }).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facespot_core::detection::domain::endpoint::DetectionEndpoint;
    use facespot_core::overlay::domain::overlay_path::EyeConnector;
    use facespot_core::shared::geometry::Offset;
    use facespot_core::shared::image_descriptor::ImageDescriptor;
    use facespot_core::viewer::overlay_controller::{
        select_image, ImageLayout, OverlayController,
    };
    use facespot_core::viewer::view_state::{Activation, ViewState};
    use std::sync::Mutex;

    struct Origin;

    impl ImageLayout for Origin {
        fn image_offset(&self) -> Offset {
            Offset::default()
        }
    }

    struct RecordingClient(Mutex<Vec<String>>);

    impl DetectionClient for RecordingClient {
        fn fetch(&self, target: &str) -> Result<DetectionResponse, ClientError> {
            self.0.lock().unwrap().push(target.to_string());
            Err(ClientError::Transport("connection refused".into()))
        }
    }

    fn pending_for(url: &str) -> PendingDetection {
        let controller =
            OverlayController::new(DetectionEndpoint::default(), EyeConnector::Preserve);
        let mut state = ViewState::new();
        select_image(
            &mut state,
            &ImageDescriptor::new(url, 10, 10),
            &mut Activation::new(),
        );
        controller
            .begin_detection(&mut state, &Origin, &mut Activation::new())
            .unwrap()
    }

    #[test]
    fn test_replies_carry_pending_and_result_in_order() {
        let first = pending_for("/img/1.jpg");
        let second = pending_for("/img/2.jpg");
        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (tx, rx) = crossbeam_channel::unbounded();
        req_tx.send(first.clone()).unwrap();
        req_tx.send(second.clone()).unwrap();
        drop(req_tx);

        let client = RecordingClient(Mutex::new(Vec::new()));
        run(&client, &req_rx, &tx);

        let reply = rx.try_recv().unwrap();
        assert_eq!(reply.pending, first);
        assert_eq!(
            reply.result,
            Err(ClientError::Transport("connection refused".into()))
        );
        assert_eq!(rx.try_recv().unwrap().pending, second);
        assert_eq!(
            *client.0.lock().unwrap(),
            vec![first.target.clone(), second.target.clone()]
        );
    }
}
