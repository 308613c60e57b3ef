use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use planeseg_core::cloud::PointCloud;
use planeseg_core::math::{Plane, PlaneWithSupport};
use planeseg_core::nalgebra::Vector3;
use rand::rngs::SmallRng;
use rand::Rng;

use super::cancel::CancelToken;
use crate::segmentation::support_of;

/// Three points spanning one plane candidate
pub(crate) type Triplet = [Vector3<f64>; 3];

// All hand-offs between adjacent stages are rendezvous channels: a producer blocks until its
// consumer accepts the value, which gives the pipeline backpressure without any buffering.
const RENDEZVOUS: usize = 0;

/// Stage 1: samples points uniformly at random (with replacement) from the cloud, indefinitely.
///
/// The stream ends when the cancel token is set or the receiving side hangs up, whichever the
/// sampler observes first.
pub(crate) fn spawn_sampler(
    cloud: Arc<PointCloud>,
    cancel: CancelToken,
    mut rng: SmallRng,
) -> Result<(Receiver<Vector3<f64>>, JoinHandle<()>)> {
    let (sender, receiver) = sync_channel(RENDEZVOUS);
    let handle = thread::Builder::new()
        .name("sampler".into())
        .spawn(move || loop {
            if cancel.is_cancelled() {
                return;
            }
            let point = cloud[rng.gen_range(0..cloud.len())];
            if sender.send(point).is_err() {
                return;
            }
        })
        .context("failed to spawn the sampler thread")?;
    Ok((receiver, handle))
}

/// Stage 2: groups the sample stream into triplets.
///
/// A group that is only partially filled when the stream ends or cancellation fires is
/// discarded, never emitted.
pub(crate) fn spawn_assembler(
    cancel: CancelToken,
    points: Receiver<Vector3<f64>>,
) -> Result<(Receiver<Triplet>, JoinHandle<()>)> {
    let (sender, receiver) = sync_channel(RENDEZVOUS);
    let handle = thread::Builder::new()
        .name("assembler".into())
        .spawn(move || loop {
            let mut triplet: Triplet = [Vector3::zeros(); 3];
            for slot in triplet.iter_mut() {
                match points.recv() {
                    Ok(point) => *slot = point,
                    Err(_) => return,
                }
            }
            if cancel.is_cancelled() {
                return;
            }
            if sender.send(triplet).is_err() {
                return;
            }
        })
        .context("failed to spawn the assembler thread")?;
    Ok((receiver, handle))
}

/// Stage 3: forwards exactly `count` triplets, then shuts the generator stages down.
///
/// This is the single place where the otherwise-infinite generator chain is made finite. After
/// the last triplet has been forwarded the limiter broadcasts the one-shot cancellation signal,
/// drops its upstream receiver (waking an assembler blocked in a hand-off) and only then closes
/// its own output.
pub(crate) fn spawn_limiter(
    cancel: CancelToken,
    triplets: Receiver<Triplet>,
    count: usize,
) -> Result<(Receiver<Triplet>, JoinHandle<()>)> {
    let (sender, receiver) = sync_channel(RENDEZVOUS);
    let handle = thread::Builder::new()
        .name("limiter".into())
        .spawn(move || {
            for _ in 0..count {
                let triplet = match triplets.recv() {
                    Ok(triplet) => triplet,
                    // upstream only closes if the run is being torn down early
                    Err(_) => break,
                };
                if sender.send(triplet).is_err() {
                    break;
                }
            }
            cancel.cancel();
            drop(triplets);
            // the output closes when `sender` drops here
        })
        .context("failed to spawn the limiter thread")?;
    Ok((receiver, handle))
}

/// Stage 4: derives a plane candidate from every triplet
pub(crate) fn spawn_estimator(
    triplets: Receiver<Triplet>,
) -> Result<(Receiver<Plane>, JoinHandle<()>)> {
    let (sender, receiver) = sync_channel(RENDEZVOUS);
    let handle = thread::Builder::new()
        .name("estimator".into())
        .spawn(move || {
            for triplet in triplets {
                if sender.send(Plane::from_triplet(&triplet)).is_err() {
                    return;
                }
            }
        })
        .context("failed to spawn the estimator thread")?;
    Ok((receiver, handle))
}

/// Stage 5: the support-evaluator pool.
///
/// `workers` threads pull candidates from the shared plane stream and score each one against
/// the whole cloud. The workers share no mutable state apart from the receiver itself; the
/// cloud is only ever read. Each worker owns its own output channel so that the fan-in stage
/// can observe every worker's completion individually.
pub(crate) fn spawn_evaluators(
    cloud: Arc<PointCloud>,
    epsilon: f64,
    workers: usize,
    planes: Receiver<Plane>,
) -> Result<(Vec<Receiver<PlaneWithSupport>>, Vec<JoinHandle<()>>)> {
    let planes = Arc::new(Mutex::new(planes));
    let mut outputs = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    for index in 0..workers {
        let planes = Arc::clone(&planes);
        let cloud = Arc::clone(&cloud);
        let (sender, receiver) = sync_channel(RENDEZVOUS);
        let handle = thread::Builder::new()
            .name(format!("evaluator-{}", index))
            .spawn(move || loop {
                // hold the lock only for the receive, so the other workers can pull
                // candidates while this one scans the cloud
                let candidate = match planes.lock() {
                    Ok(planes) => planes.recv(),
                    // a poisoned lock means another worker panicked; give up
                    Err(_) => return,
                };
                let plane = match candidate {
                    Ok(plane) => plane,
                    Err(_) => return,
                };
                if sender.send(support_of(&plane, &cloud, epsilon)).is_err() {
                    return;
                }
            })
            .with_context(|| format!("failed to spawn evaluator thread {}", index))?;
        outputs.push(receiver);
        handles.push(handle);
    }
    Ok((outputs, handles))
}

/// Stage 6: multiplexes the evaluator outputs into a single stream.
///
/// Every value from every input is forwarded exactly once, in no particular order. The merged
/// stream closes once all forwarders have finished, i.e. once every evaluator has completed
/// and all its pending values have been passed on.
pub(crate) fn fan_in(
    inputs: Vec<Receiver<PlaneWithSupport>>,
) -> Result<(Receiver<PlaneWithSupport>, Vec<JoinHandle<()>>)> {
    let (sender, receiver) = sync_channel(RENDEZVOUS);
    let mut handles = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let sender = sender.clone();
        let handle = thread::Builder::new()
            .name(format!("fan-in-{}", index))
            .spawn(move || {
                for value in input {
                    if sender.send(value).is_err() {
                        return;
                    }
                }
            })
            .with_context(|| format!("failed to spawn fan-in thread {}", index))?;
        handles.push(handle);
    }
    // drop the original sender: the merged stream now closes exactly when the last forwarder
    // has drained its input
    drop(sender);
    Ok((receiver, handles))
}
