use anyhow::Result;
use cibell_common::types::BuildStatus;
use cibell_notify::config::NotifyConfig;
use cibell_notify::dispatcher::MessageDispatcher;
use cibell_notify::message::{MessageModel, MsgType};
use cibell_notify::utils::redacted_policies;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cibell <config.toml> test <robot-id>                       Send a test text message");
    eprintln!("  cibell <config.toml> send <robot-id> <type> <text> [title] Send a message");
    eprintln!();
    eprintln!("Types: text, image, share_chat, post, link, markdown, card");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cibell=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(config_path), Some(command)) = (args.get(1), args.get(2)) else {
        print_usage();
        anyhow::bail!("missing arguments");
    };

    let config = NotifyConfig::load(config_path)?;
    for robot in &config.robots {
        tracing::info!(
            id = %robot.id,
            name = %robot.name,
            policies = %redacted_policies(&robot.security_policies),
            "registered robot"
        );
    }
    let dispatcher = MessageDispatcher::new(config);

    let result = match command.as_str() {
        "test" => {
            let robot_id = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("test requires <robot-id>")
            })?;
            let mut msg = MessageModel::new(MsgType::Text);
            msg.status = Some(BuildStatus::Success);
            msg.text = "cibell connectivity test".to_string();
            dispatcher.send(robot_id, &msg).await
        }
        "send" => {
            let (Some(robot_id), Some(msg_type), Some(text)) =
                (args.get(3), args.get(4), args.get(5))
            else {
                print_usage();
                anyhow::bail!("send requires <robot-id> <type> <text>");
            };
            let msg_type: MsgType = msg_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let mut msg = MessageModel::new(msg_type);
            msg.text = text.clone();
            if let Some(title) = args.get(6) {
                msg.title = title.clone();
            }
            dispatcher.send(robot_id, &msg).await
        }
        other => {
            print_usage();
            anyhow::bail!("unknown command: {other}");
        }
    };

    if result.is_ok() {
        tracing::info!("notification delivered");
        Ok(())
    } else {
        anyhow::bail!("delivery failed: {}", result.message());
    }
}
