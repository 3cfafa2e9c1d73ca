use async_trait::async_trait;
use hlfd_core::{register_environment_with_config, EngineError, Environment, Observation, Snapshot, ToolCall};
use hlfd_rs::types::Action;
use hlfd_rs::{HlfdConfig, HlfdEnv, HlfdError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};
use std::sync::Arc;

pub const ENV_NAME: &str = "MiniGrid-HLfD-v0";

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub env: HlfdConfig,
    /// Seed for the layout RNG; 0 when absent.
    pub seed: Option<u64>,
}

fn engine_err(e: HlfdError) -> EngineError {
    match e {
        HlfdError::UnknownAction(_) | HlfdError::Config(_) => EngineError::Validation(e.to_string()),
        other => EngineError::Internal(other.to_string()),
    }
}

/// Accepts an action name (`"forward"`) or its index (`2`).
fn parse_action(v: &Json) -> Result<Action, EngineError> {
    if let Some(name) = v.as_str() {
        return name.parse().map_err(engine_err);
    }
    let idx = v
        .as_u64()
        .ok_or_else(|| EngineError::Validation(format!("action must be a name or index, got {v}")))?;
    let idx = u8::try_from(idx).map_err(|_| EngineError::Validation(format!("invalid action index {idx}")))?;
    Action::try_from(idx).map_err(engine_err)
}

pub struct HlfdEnvironment {
    env: HlfdEnv,
    rng: ChaCha8Rng,
    reward_last: i32,
    total_reward: i32,
    terminated: bool,
    truncated: bool,
}

impl HlfdEnvironment {
    pub fn new(cfg: Config) -> Result<Self, EngineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(cfg.seed.unwrap_or(0));
        let env = HlfdEnv::new(cfg.env, &mut rng).map_err(engine_err)?;
        Ok(Self { env, rng, reward_last: 0, total_reward: 0, terminated: false, truncated: false })
    }

    pub fn engine(&self) -> &HlfdEnv {
        &self.env
    }

    /// New layout from the owned RNG; `seed` reseeds it first.
    fn reset(&mut self, seed: Option<u64>) -> Result<(), EngineError> {
        if let Some(seed) = seed {
            tracing::debug!(seed, "reseeding layout rng");
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.env.reset(&mut self.rng).map_err(engine_err)?;
        self.reward_last = 0;
        self.total_reward = 0;
        self.terminated = false;
        self.truncated = false;
        Ok(())
    }

    fn apply(&mut self, action: Action) -> Result<(), EngineError> {
        let r = self.env.step(action).map_err(engine_err)?;
        self.reward_last = r.reward;
        self.total_reward += r.reward;
        if r.done {
            let truncated = r.info.get("truncated").and_then(Json::as_bool).unwrap_or(false);
            self.truncated = truncated;
            self.terminated = !truncated;
        }
        Ok(())
    }

    fn finished(&self) -> bool {
        self.terminated || self.truncated
    }

    fn interact(&mut self, args: &Json) -> Result<(), EngineError> {
        if self.finished() {
            return Err(EngineError::Validation("episode is over; call reset".into()));
        }
        if let Some(a) = args.get("action") {
            self.apply(parse_action(a)?)
        } else if let Some(arr) = args.get("actions").and_then(|v| v.as_array()) {
            // Parse everything up front so a bad entry leaves the episode untouched.
            let actions = arr.iter().map(parse_action).collect::<Result<Vec<_>, _>>()?;
            for act in actions {
                self.apply(act)?;
                if self.finished() {
                    break;
                }
            }
            Ok(())
        } else {
            Err(EngineError::Validation("missing 'action' or 'actions'".into()))
        }
    }

    fn snapshot_obs(&self, event: &str) -> Observation {
        let obs = self.env.observation();
        let data = json!({
            "image": obs.image,
            "direction": obs.direction,
            "agent_pos": [obs.agent_pos.0, obs.agent_pos.1],
            "goal_pos": [obs.goal_pos.0, obs.goal_pos.1],
            "step_count": self.env.step_count(),
            "reward_last": self.reward_last,
            "total_reward": self.total_reward,
            "event": event,
        });
        Observation { terminated: self.terminated, truncated: self.truncated, data }
    }
}

#[async_trait]
impl Environment for HlfdEnvironment {
    async fn initialize(&mut self) -> Result<Observation, EngineError> {
        self.reset(None)?;
        let params = self.env.layout_params();
        tracing::debug!(obstacle_xs = ?params.obstacle_xs, width = params.width, "initialized");
        Ok(self.snapshot_obs("initialize"))
    }

    async fn step(&mut self, tool_calls: Vec<ToolCall>) -> Result<Observation, EngineError> {
        let call = tool_calls.first().ok_or_else(|| EngineError::Validation("no tool_calls".into()))?;
        match call.tool.as_str() {
            "interact" => {
                self.interact(&call.args)?;
                Ok(self.snapshot_obs("step"))
            }
            "reset" => {
                let seed = match call.args.get("seed") {
                    None | Some(Json::Null) => None,
                    Some(v) => Some(v.as_u64().ok_or_else(|| EngineError::Validation(format!("bad seed: {v}")))?),
                };
                self.reset(seed)?;
                Ok(self.snapshot_obs("reset"))
            }
            other => Err(EngineError::Validation(format!("unknown tool: {other}"))),
        }
    }

    async fn terminate(&mut self) -> Result<Observation, EngineError> {
        self.terminated = true;
        Ok(self.snapshot_obs("terminate"))
    }

    async fn checkpoint(&self) -> Result<Snapshot, EngineError> {
        let data = serde_json::to_value(self.env.public_state())
            .map_err(|e| EngineError::Internal(format!("serialize state: {e}")))?;
        Ok(Snapshot { version: 1, engine: "hlfd".into(), data })
    }
}

pub fn register_default_env() {
    register_environment_with_config(
        ENV_NAME,
        Arc::new(|cfg: Option<Json>| -> Result<Box<dyn Environment>, EngineError> {
            let cfg: Config = match cfg {
                Some(v) => serde_json::from_value(v).map_err(|e| EngineError::Validation(format!("bad config: {e}")))?,
                None => Config::default(),
            };
            Ok(Box::new(HlfdEnvironment::new(cfg)?))
        }),
    );
}
