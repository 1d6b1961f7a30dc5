use crate::agent;
use crate::cli::{ChatArgs, Command};
use crate::core::error::SahayakError;
use crate::dispatch::{CascadeDispatcher, ChatRequest, ChatResult};
use crate::display;
use crate::prompt::{ChatContext, Language};
use crate::recommend;

pub struct Application {
    dispatcher: CascadeDispatcher,
}

impl Application {
    pub fn new(dispatcher: CascadeDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn run(&self, command: Command) -> Result<(), SahayakError> {
        match command {
            Command::Chat(args) => self.handle_chat(args).await,
            Command::Agent(args) => self.handle_agent(args).await,
            Command::Models => {
                display::display_models(self.dispatcher.registry());
                Ok(())
            }
            Command::Status => {
                display::display_status(self.dispatcher.registry());
                Ok(())
            }
            Command::Recommend {
                community_type,
                json,
            } => self.handle_recommend(&community_type, json),
        }
    }

    async fn handle_chat(&self, args: ChatArgs) -> Result<(), SahayakError> {
        let request = build_request(&args, args.message.clone())?;
        let result = self.dispatcher.dispatch(&request).await;

        if args.json {
            let envelope = serde_json::json!({
                "message": result.text,
                "language": request.language.code(),
            });
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        } else {
            display::display_reply(&result);
        }

        Ok(())
    }

    async fn handle_agent(&self, args: ChatArgs) -> Result<(), SahayakError> {
        let request = build_request(&args, agent::agent_prompt(&args.message))?;
        let result = self.dispatcher.dispatch(&request).await;
        let reply = agent::extract_structured(&result.text);

        if args.json {
            println!("{}", serde_json::to_string_pretty(&reply)?);
        } else {
            display::display_reply(&ChatResult {
                text: reply.response.clone(),
                provider_used: result.provider_used,
                model_used: result.model_used,
            });
            println!(
                "type: {} · category: {} · priority: {}",
                reply.meta.kind, reply.meta.category, reply.meta.priority
            );
        }

        Ok(())
    }

    fn handle_recommend(&self, community_type: &str, json: bool) -> Result<(), SahayakError> {
        let recommendations = recommend::recommendations_for(community_type);

        if json {
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
        } else {
            display::display_recommendations(&recommendations);
        }

        Ok(())
    }
}

fn build_request(args: &ChatArgs, message: String) -> Result<ChatRequest, SahayakError> {
    if message.trim().is_empty() {
        return Err(SahayakError::Input("message is empty".to_string()));
    }

    let context = if args.community_type.is_some() || args.location.is_some() {
        Some(ChatContext {
            community_type: args.community_type.clone(),
            location: args.location.clone(),
        })
    } else {
        None
    };

    Ok(ChatRequest {
        message,
        language: Language::from_code(&args.language),
        context,
        model_hint: args.model.clone(),
    })
}
