//! Task services: the ownership-enforcing repository and the optimistic list

mod task_list;
mod task_repository;

pub use task_list::TaskListController;
pub use task_repository::TaskRepository;
