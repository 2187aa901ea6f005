mod decode;
mod flow;
