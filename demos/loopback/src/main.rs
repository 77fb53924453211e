//! Drives a simulated robot over an in-memory link.
//!
//! The far end of a `LoopbackLink` plays a robot on a 10x10 grid: it
//! answers every movement with its new location and every END with DONE,
//! then hangs up. Run with `RUST_LOG=robolink_dispatch=trace` to watch
//! the loops tick.

use std::sync::Arc;

use robolink::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const GRID_MAX: i32 = 9;

// ---------------------------------------------------------------------------
// Simulated robot
// ---------------------------------------------------------------------------

struct Robot {
    link: LoopbackLink,
    position: Point,
}

impl Robot {
    async fn run(mut self) -> Result<(), RobolinkError> {
        self.reply(Message::StateChange).await?;

        while let Some(data) = self.link.recv().await? {
            let token = String::from_utf8_lossy(&data);
            match classify(&token)? {
                Message::Movement(movement) => {
                    if movement.is_move {
                        self.position = self
                            .position
                            .step(movement.direction)
                            .clamp(Point::ORIGIN, Point::new(GRID_MAX, GRID_MAX));
                    }
                    self.reply(Message::location(self.position)?).await?;
                }
                Message::End => {
                    self.reply(Message::Done).await?;
                    break;
                }
                other => tracing::info!(%other, "robot ignored command"),
            }
        }

        self.link.close().await?;
        Ok(())
    }

    async fn reply(&self, message: Message) -> Result<(), RobolinkError> {
        self.link.send(encode(&message).as_bytes()).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let manager = RobotCommandManager::new(DispatchConfig::default());
    let (app_end, robot_end) = LoopbackLink::pair();
    let bridge = RobotLinkBridge::spawn(&manager, Arc::new(app_end));
    let robot = tokio::spawn(
        Robot {
            link: robot_end,
            position: Point::new(2, 2),
        }
        .run(),
    );

    let mut sent = manager.subscribe_sent();
    let mut received = manager.subscribe_received();
    manager.start()?;

    let route = [
        (Direction::Up, true),
        (Direction::Up, true),
        (Direction::Right, true),
        (Direction::Down, false),
        (Direction::Left, true),
    ];
    for (direction, is_move) in route {
        manager.enqueue_outbound(Message::movement(direction, is_move));
    }
    manager.enqueue_outbound(Message::End);

    loop {
        tokio::select! {
            Some(event) = sent.recv() => {
                println!("-> {}", event.wire);
            }
            Some(event) = received.recv() => match event {
                ReceivedEvent::Message(Message::Done) => {
                    println!("<- {}", Message::Done);
                    break;
                }
                ReceivedEvent::Message(message) => {
                    println!("<- {message} ({})", message.kind());
                }
                ReceivedEvent::Rejected { token, error } => {
                    println!("<- rejected {token:?}: {error}");
                }
            },
        }
    }

    let report = manager.shutdown().await?;
    tracing::info!(
        sent = report.outbound.processed,
        received = report.inbound.processed,
        rejected = report.inbound.errors,
        "demo finished"
    );
    bridge.close().await?;
    robot.await??;
    Ok(())
}
