//! Stack and service operations over the docker CLI

use super::network::Network;
use super::service::{Replication, Service};
use super::task::Task;
use crate::config::StackConfig;
use crate::docker::inspect::{inspect, ObjectKind};
use crate::docker::{ensure_success, CommandRunner, DockerCli};
use crate::error::{Result, StackError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Facade over the swarm, as seen through the docker client
pub struct Orchestrator<R: CommandRunner = DockerCli> {
    runner: R,
    /// Pause between network checks while a stack is being removed
    poll_interval: Duration,
    /// None waits for network removal forever
    removal_timeout: Option<Duration>,
    /// How long a task must have been running to count as stable
    stability_window: Duration,
}

impl Orchestrator<DockerCli> {
    /// Orchestrator driving the docker binary named in `config`
    pub fn from_config(config: &StackConfig) -> Self {
        Orchestrator::new(DockerCli::new(&config.docker_binary)).with_config(config)
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Create an orchestrator with default timings
    pub fn new(runner: R) -> Self {
        let defaults = StackConfig::default();
        Self {
            runner,
            poll_interval: defaults.poll_interval_duration(),
            removal_timeout: defaults.removal_timeout_duration(),
            stability_window: defaults.stability_window_duration(),
        }
    }

    /// Take timings from `config`
    pub fn with_config(self, config: &StackConfig) -> Self {
        self.poll_interval(config.poll_interval_duration())
            .removal_timeout(config.removal_timeout_duration())
            .stability_window(config.stability_window_duration())
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn removal_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.removal_timeout = timeout;
        self
    }

    pub fn stability_window(mut self, window: Duration) -> Self {
        self.stability_window = window;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Remove a stack and block until its network is gone.
    ///
    /// Without a removal timeout this waits indefinitely.
    pub fn remove_stack(&self, stack: &str) -> Result<()> {
        info!("Removing stack {}", stack);

        let output = self.runner.run(&["stack", "rm", stack])?;
        ensure_success(&format!("Failed removing stack {}", stack), &output)
            .map_err(into_operation)?;

        let started = Instant::now();
        while self.stack_network_exists(stack)? {
            if let Some(timeout) = self.removal_timeout {
                if started.elapsed() >= timeout {
                    return Err(StackError::Timeout(format!(
                        "Network of stack {} still present after {}s",
                        stack,
                        timeout.as_secs()
                    )));
                }
            }

            info!("Waiting for network removal of stack {}", stack);
            std::thread::sleep(self.poll_interval);
        }

        info!("Stack {} removed", stack);
        Ok(())
    }

    /// Names of services whose name matches the stack prefix
    pub fn list_stack_services(&self, stack: &str) -> Result<Vec<String>> {
        let filter = format!("name={}", stack);
        let output = self
            .runner
            .run(&["service", "ls", "--format", "{{.Name}}", "--filter", &filter])?;
        ensure_success(
            &format!("Failed listing services for stack {}", stack),
            &output,
        )
        .map_err(into_operation)?;

        Ok(output.stdout_lines())
    }

    /// Whether any network still carries the stack's namespace label
    pub fn stack_network_exists(&self, stack: &str) -> Result<bool> {
        let filter = format!("name={}", stack);
        let output = self
            .runner
            .run(&["network", "ls", "--format", "{{ .Name }}", "--filter", &filter])?;
        ensure_success(
            &format!("Failed listing networks for stack {}", stack),
            &output,
        )
        .map_err(into_operation)?;

        for name in output.stdout_lines() {
            let network: Network = match inspect(&self.runner, ObjectKind::Network, &name) {
                Ok(network) => network,
                Err(e) if e.is_not_found() => {
                    debug!("Network {} disappeared before inspection", name);
                    continue;
                }
                Err(StackError::Decode(msg)) => {
                    warn!("Skipping network {}: {}", name, msg);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if network.belongs_to(stack) {
                debug!("Network {} belongs to stack {}", name, stack);
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Desired and running task counts of a service.
    ///
    /// Replicated services want their declared replica count, global
    /// services one task per node. Tasks that no longer exist are skipped.
    pub fn replication(&self, service: &str) -> Result<Replication> {
        debug!("Checking replication of service {}", service);

        let spec: Service = inspect(&self.runner, ObjectKind::Service, service)?;
        let mode = spec.mode()?;
        let desired = Replication::desired_for(mode, || self.node_count())?;

        let mut running = 0;
        for task_id in self.service_task_ids(service)? {
            match self.task(&task_id) {
                Ok(task) if task.is_running() => running += 1,
                Ok(_) => {}
                Err(e) if e.is_not_found() => {
                    debug!("Ignoring vanished task {} of service {}", task_id, service);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Replication { desired, running })
    }

    /// Whether the running task count matches the desired count
    pub fn is_service_fully_replicated(&self, service: &str) -> Result<bool> {
        Ok(self.replication(service)?.is_complete())
    }

    /// Whether at least one task of the service is stable.
    ///
    /// Errors while looking at individual tasks count as "not stable".
    pub fn is_service_running(&self, service: &str) -> Result<bool> {
        debug!("Checking if service {} is running", service);

        for task_id in self.service_task_ids(service)? {
            match self.task(&task_id) {
                Ok(task) if task.is_stable(self.stability_window) => return Ok(true),
                Ok(task) => match &task.status.err {
                    Some(err) => warn!("Task {} is {:?}: {}", task_id, task.status.state, err),
                    None => debug!(
                        "Task {} is {:?}: {}",
                        task_id, task.status.state, task.status.message
                    ),
                },
                Err(e) => warn!("Treating task {} as unstable: {}", task_id, e),
            }
        }

        Ok(false)
    }

    /// Full task ids of a service, including finished ones
    pub fn service_task_ids(&self, service: &str) -> Result<Vec<String>> {
        let output = self
            .runner
            .run(&["service", "ps", "--quiet", "--no-trunc", service])?;
        ensure_success(&format!("Failed listing tasks of service {}", service), &output)?;

        Ok(output.stdout_lines())
    }

    /// Inspect one task
    pub fn task(&self, task_id: &str) -> Result<Task> {
        inspect(&self.runner, ObjectKind::Task, task_id)
    }

    /// Number of nodes in the cluster
    pub fn node_count(&self) -> Result<u64> {
        let output = self.runner.run(&["node", "ls", "--quiet"])?;
        ensure_success("Failed to list docker nodes", &output).map_err(into_operation)?;

        let nodes = output.stdout_lines();
        if nodes.is_empty() {
            return Err(StackError::Operation(
                "Unexpected empty output for docker node ls".to_string(),
            ));
        }

        Ok(nodes.len() as u64)
    }
}

/// List and remove commands never mean "missing object"; report them as failures
fn into_operation(e: StackError) -> StackError {
    match e {
        StackError::NotFound(msg) => StackError::Operation(msg),
        other => other,
    }
}
